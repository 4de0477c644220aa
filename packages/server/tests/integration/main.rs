mod comic;
mod common;
