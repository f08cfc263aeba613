mod return_types;
mod support;
