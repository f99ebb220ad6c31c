mod admin;
mod authn;
mod authz;
mod db;
mod handlers;
mod mail;
mod response;
mod service;
mod validation;

pub mod config;
pub mod factory;
pub mod restful;
