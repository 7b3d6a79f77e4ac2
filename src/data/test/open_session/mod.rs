use crate::{
    data::open_session::OpenSessionRepository,
    model::session::{OpenSession, SessionKey},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod get_all;
mod upsert;
