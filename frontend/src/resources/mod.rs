//! One module per remote collection. Each implements [`Resource`](crate::resource::Resource).

pub mod bills;
pub mod cars;
pub mod reservations;
pub mod users;

pub use bills::Bill;
pub use cars::Car;
pub use reservations::Reservation;
pub use users::User;
