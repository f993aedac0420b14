mod common;
mod coverage;
mod exclusion;
mod hospital;
mod terminology;
