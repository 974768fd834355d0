// Event script toolchain: compiles map/event scripts to runtime bytecode

pub mod script_compiler;
