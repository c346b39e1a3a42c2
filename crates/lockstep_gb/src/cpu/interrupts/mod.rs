mod ime;
mod poll;
mod service;
