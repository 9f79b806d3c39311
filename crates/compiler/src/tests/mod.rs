mod helpers;

mod scenarios;
mod serialization;
mod wildcard;
