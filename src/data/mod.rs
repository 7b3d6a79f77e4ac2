//! Database repository layer.
//!
//! Repositories use SeaORM entity models internally and return domain models.
//! They are generic over [`sea_orm::ConnectionTrait`] so the session store can run
//! several repository calls inside one transaction.

pub mod attendance_session;
pub mod open_session;

#[cfg(test)]
mod test;
