//! Per-call validation state.
//!
//! One context is created per top-level call and discarded at its end. It
//! carries the current path for error reporting and a borrow of the
//! caller's options; nothing in it is ever shared between calls.

use crate::errors::Path;
use crate::schema::normalize::Descriptor;
use crate::schema::types::UnknownKeys;
use crate::validate::Options;

pub(crate) struct Context<'a> {
    path: Path,
    options: &'a Options,
}

impl<'a> Context<'a> {
    pub(crate) fn new(options: &'a Options) -> Self {
        Self {
            path: Path::new(),
            options,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn options(&self) -> &'a Options {
        self.options
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.path.push_key(key);
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.path.push_index(index);
    }

    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    // Effective flag resolution: the descriptor's own setting wins, then the
    // per-call defaults seed, then the hard default.

    pub(crate) fn required(&self, descriptor: &Descriptor) -> bool {
        descriptor
            .required
            .or(self.options.defaults.required)
            .unwrap_or(false)
    }

    pub(crate) fn allow_null(&self, descriptor: &Descriptor) -> bool {
        descriptor
            .allow_null
            .or(self.options.defaults.allow_null)
            .unwrap_or(false)
    }

    pub(crate) fn trim(&self, descriptor: &Descriptor) -> bool {
        descriptor
            .trim
            .or(self.options.defaults.trim)
            .unwrap_or(false)
    }

    pub(crate) fn autowrap(&self, descriptor: &Descriptor) -> bool {
        descriptor
            .autowrap
            .or(self.options.defaults.autowrap)
            .unwrap_or(false)
    }

    pub(crate) fn unique(&self, descriptor: &Descriptor) -> bool {
        descriptor
            .unique
            .or(self.options.defaults.unique)
            .unwrap_or(false)
    }

    pub(crate) fn unknown_keys(&self, descriptor: &Descriptor) -> UnknownKeys {
        descriptor
            .unknown_keys
            .or(self.options.defaults.unknown_keys)
            .unwrap_or(UnknownKeys::Deny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Defaults;

    #[test]
    fn test_descriptor_setting_wins_over_defaults() {
        let options = Options {
            defaults: Defaults {
                required: Some(true),
                ..Defaults::default()
            },
        };
        let ctx = Context::new(&options);

        let unset = Descriptor::default();
        assert!(ctx.required(&unset));

        let explicit_off = Descriptor {
            required: Some(false),
            ..Descriptor::default()
        };
        assert!(!ctx.required(&explicit_off));
    }

    #[test]
    fn test_hard_defaults_apply_when_nothing_is_set() {
        let options = Options::default();
        let ctx = Context::new(&options);
        let descriptor = Descriptor::default();

        assert!(!ctx.required(&descriptor));
        assert!(!ctx.allow_null(&descriptor));
        assert!(!ctx.trim(&descriptor));
        assert!(!ctx.autowrap(&descriptor));
        assert!(!ctx.unique(&descriptor));
        assert_eq!(ctx.unknown_keys(&descriptor), UnknownKeys::Deny);
    }

    #[test]
    fn test_path_tracking() {
        let options = Options::default();
        let mut ctx = Context::new(&options);

        assert_eq!(ctx.path().to_string(), "$");
        ctx.push_key("user");
        ctx.push_key("tags");
        ctx.push_index(1);
        assert_eq!(ctx.path().to_string(), "user.tags[1]");
        ctx.pop();
        ctx.pop();
        assert_eq!(ctx.path().to_string(), "user");
    }
}
