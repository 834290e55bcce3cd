use crate::{
    cart::CartStore,
    db::{DbPool, OrmConn},
    pricing::ShippingPolicy,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub carts: CartStore,
    pub shipping: ShippingPolicy,
}
