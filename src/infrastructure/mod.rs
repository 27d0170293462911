//! Infrastructure: constants, URL templating, HTTP envelope, scaffold

pub mod constants;
pub mod http;
pub mod scaffold;
pub mod url;
