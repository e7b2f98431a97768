#![allow(dead_code)]

pub mod project;
