use std::io::{Error, Result};

use actix_web::web;
use env_logger::Env;
use log::warn;

use crate::{
    core::{data::load_document, settings::Settings},
    server::{start_server, AppState},
};

mod auth;
mod core;
mod error;
mod server;
mod types;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::load().map_err(|err| Error::other(err.to_string()))?;
    let addr = settings.addr();

    let published = match load_document(&settings.document_source.value).await {
        Ok(document) => Some(document),
        Err(err) => {
            warn!(
                "Could not load {}: {}. The public site will show an error.",
                settings.document_source.value, err
            );
            None
        }
    };

    let state = web::Data::new(AppState::new(settings, published));
    start_server(state, addr).await
}
