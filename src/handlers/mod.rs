// handlers/mod.rs - HTTP handlers, split by whether the login gate lets
// anonymous requests through.
//
// public:    /employee/login, /employee/logout (on the exempt list)
// protected: everything else; handlers run with an identity bound

pub mod protected;
pub mod public;
