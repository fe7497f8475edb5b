pub mod remote;

use crate::domain::models::ThreadStoreBox;

pub struct StoreManager {}

impl StoreManager {
    pub fn get() -> ThreadStoreBox {
        return Box::<remote::RemoteThreadStore>::default();
    }
}
