/// Transient text surfaced to the user when a store request fails. Never
/// fatal, never blocking. Held until the view consumes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
}

impl Notice {
    pub fn new(text: &str) -> Notice {
        return Notice {
            text: text.to_string(),
        };
    }
}
