pub mod cache;
pub mod config;
pub mod contact;
pub mod domain;
pub mod errors;
pub mod gallery;
pub mod handlers;
pub mod instagram;
pub mod mailer;
pub mod models;
pub mod oauth;
pub mod routes;

use crate::{
    config::Config,
    contact::ContactRelay,
    instagram::MediaService,
    oauth::InstagramOAuth,
};

/// AppState holds shared resources for the web server.
pub struct AppState {
    pub config: Config,
    pub media: MediaService,
    pub oauth: InstagramOAuth,
    pub contact: ContactRelay,
}
