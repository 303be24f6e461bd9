mod alerts;
mod common;
mod gateway;
