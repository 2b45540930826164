//! 商品目录服务库
//! 用户注册/登录（JWT）与商品 CRUD

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
