mod parameters;
mod support;
