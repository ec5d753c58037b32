mod discovery;
mod session;
