mod probing;
mod registry;
