//! Support code inlined into generated output.

/// Name the curry helper is bound to in generated code.
pub const CURRY_NAME: &str = "__curry";

/// Collects arguments until the wrapped function's arity is reached, so a
/// curried function can be applied one argument at a time or all at once.
pub const CURRY_HELPER: &str = "\
const __curry = (fn) => {
  const curried = (...args) =>
    args.length >= fn.length ? fn(...args) : (...rest) => curried(...args, ...rest);
  return curried;
};";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_binds_the_curry_name() {
        assert!(CURRY_HELPER.starts_with(&format!("const {CURRY_NAME} = ")));
        assert!(CURRY_HELPER.ends_with("};"));
    }
}
