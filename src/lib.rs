//! Backend de escalas para casernas de bombeiros: rotação 10/14, teto semanal
//! de horas, reconciliação de gardes e importação da base antiga.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod scheduling;
pub mod services;
