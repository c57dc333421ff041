//! Course authoring studio: course info, a module/content editor, a quiz builder and a
//! video library with a player, all held in memory for one authoring session.

pub mod blobs;
pub mod config;
pub mod course;
pub mod editor;
pub mod error;
pub mod ids;
pub mod library;
pub mod models;
pub mod player;
pub mod quiz;
pub mod routes;
pub mod shell;
pub mod studio;
pub mod tasks;
pub mod templates;
