//! Declaration modifiers.
//!
//! Modifiers are validated against the set each declaration kind accepts
//! and may only be assigned once.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifier bits of a class, method, property or constant.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        /// Abstract without the keyword (interfaces, interface methods).
        const IMPLICIT_ABSTRACT = 1 << 4;
        /// Declared with the `abstract` keyword.
        const EXPLICIT_ABSTRACT = 1 << 5;
        const FINAL = 1 << 6;
        const READONLY = 1 << 7;
    }
}

impl Modifiers {
    /// Method-level abstract flag.
    pub const ABSTRACT: Modifiers = Modifiers::IMPLICIT_ABSTRACT;

    /// All visibility bits.
    pub const VISIBILITY: Modifiers = Modifiers::PUBLIC
        .union(Modifiers::PROTECTED)
        .union(Modifiers::PRIVATE);

    #[inline]
    pub const fn is_abstract(self) -> bool {
        self.intersects(Modifiers::IMPLICIT_ABSTRACT.union(Modifiers::EXPLICIT_ABSTRACT))
    }

    #[inline]
    pub const fn is_public(self) -> bool {
        self.contains(Modifiers::PUBLIC)
    }

    #[inline]
    pub const fn is_protected(self) -> bool {
        self.contains(Modifiers::PROTECTED)
    }

    #[inline]
    pub const fn is_private(self) -> bool {
        self.contains(Modifiers::PRIVATE)
    }

    #[inline]
    pub const fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    #[inline]
    pub const fn is_final(self) -> bool {
        self.contains(Modifiers::FINAL)
    }

    /// Replace the visibility bits with `visibility`.
    #[must_use]
    pub fn with_visibility(self, visibility: Modifiers) -> Modifiers {
        (self - Modifiers::VISIBILITY) | (visibility & Modifiers::VISIBILITY)
    }

    /// The visibility bits only.
    #[inline]
    pub fn visibility(self) -> Modifiers {
        self & Modifiers::VISIBILITY
    }
}

/// What kind of declaration a modifier set belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclarationKind {
    Class,
    Interface,
    Trait,
    Method,
    Property,
    Constant,
}

impl DeclarationKind {
    /// Modifier bits this declaration kind accepts.
    pub const fn allowed(self) -> Modifiers {
        match self {
            DeclarationKind::Class | DeclarationKind::Trait => Modifiers::EXPLICIT_ABSTRACT
                .union(Modifiers::IMPLICIT_ABSTRACT)
                .union(Modifiers::FINAL),
            DeclarationKind::Interface => Modifiers::IMPLICIT_ABSTRACT,
            DeclarationKind::Method => Modifiers::VISIBILITY
                .union(Modifiers::STATIC)
                .union(Modifiers::ABSTRACT)
                .union(Modifiers::FINAL),
            DeclarationKind::Property => Modifiers::VISIBILITY
                .union(Modifiers::STATIC)
                .union(Modifiers::READONLY),
            DeclarationKind::Constant => Modifiers::VISIBILITY.union(Modifiers::FINAL),
        }
    }

    /// Human-readable list of the accepted modifiers.
    pub const fn allowed_names(self) -> &'static str {
        match self {
            DeclarationKind::Class | DeclarationKind::Trait => {
                "IS_EXPLICIT_ABSTRACT, IS_IMPLICIT_ABSTRACT and IS_FINAL"
            }
            DeclarationKind::Interface => "IS_IMPLICIT_ABSTRACT",
            DeclarationKind::Method => {
                "IS_PUBLIC, IS_PROTECTED, IS_PRIVATE, IS_STATIC, IS_ABSTRACT and IS_FINAL"
            }
            DeclarationKind::Property => {
                "IS_PUBLIC, IS_PROTECTED, IS_PRIVATE, IS_STATIC and IS_READONLY"
            }
            DeclarationKind::Constant => "IS_PUBLIC, IS_PROTECTED, IS_PRIVATE and IS_FINAL",
        }
    }

    /// Check `modifiers` against the accepted set and the exclusive pairs.
    pub fn validate(self, modifiers: Modifiers) -> Result<(), ModifierError> {
        if !self.allowed().contains(modifiers) {
            return Err(ModifierError::Invalid {
                kind: self,
                allowed: self.allowed_names(),
            });
        }
        if modifiers.visibility().bits().count_ones() > 1 {
            return Err(ModifierError::Conflicting {
                kind: self,
                reason: "multiple visibility modifiers",
            });
        }
        if modifiers.contains(Modifiers::EXPLICIT_ABSTRACT | Modifiers::FINAL)
            || modifiers.contains(Modifiers::IMPLICIT_ABSTRACT | Modifiers::FINAL)
        {
            return Err(ModifierError::Conflicting {
                kind: self,
                reason: "abstract and final",
            });
        }
        Ok(())
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Trait => "trait",
            DeclarationKind::Method => "method",
            DeclarationKind::Property => "field",
            DeclarationKind::Constant => "constant",
        })
    }
}

/// Error assigning modifiers to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModifierError {
    #[error("Invalid {kind} modifier given, allowed modifiers are {allowed}.")]
    Invalid {
        kind: DeclarationKind,
        allowed: &'static str,
    },
    #[error("Cannot overwrite previously set {kind} modifiers.")]
    AlreadyAssigned { kind: DeclarationKind },
    #[error("Invalid {kind} modifiers: {reason}.")]
    Conflicting {
        kind: DeclarationKind,
        reason: &'static str,
    },
}

/// Assign-once modifier storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierSlot {
    bits: Modifiers,
    assigned: bool,
}

impl ModifierSlot {
    /// A slot that already holds `bits` and rejects any assignment.
    pub const fn fixed(bits: Modifiers) -> Self {
        ModifierSlot {
            bits,
            assigned: true,
        }
    }

    #[inline]
    pub const fn get(&self) -> Modifiers {
        self.bits
    }

    #[inline]
    pub const fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Validate and store `modifiers`. Fails if the slot was assigned before.
    pub fn assign(&mut self, kind: DeclarationKind, modifiers: Modifiers) -> Result<(), ModifierError> {
        if self.assigned {
            return Err(ModifierError::AlreadyAssigned { kind });
        }
        kind.validate(modifiers)?;
        self.bits = modifiers;
        self.assigned = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_accepts_visibility_static_abstract_final() {
        let mut slot = ModifierSlot::default();
        assert_eq!(
            slot.assign(DeclarationKind::Method, Modifiers::PUBLIC | Modifiers::STATIC),
            Ok(())
        );
        assert!(slot.get().is_public());
        assert!(slot.get().is_static());
    }

    #[test]
    fn second_assignment_fails() {
        let mut slot = ModifierSlot::default();
        assert_eq!(slot.assign(DeclarationKind::Class, Modifiers::FINAL), Ok(()));
        let err = slot.assign(DeclarationKind::Class, Modifiers::FINAL);
        assert_eq!(
            err,
            Err(ModifierError::AlreadyAssigned {
                kind: DeclarationKind::Class
            })
        );
        assert_eq!(slot.get(), Modifiers::FINAL);
    }

    #[test]
    fn second_assignment_fails_even_after_empty_set() {
        let mut slot = ModifierSlot::default();
        assert_eq!(slot.assign(DeclarationKind::Property, Modifiers::empty()), Ok(()));
        assert!(slot.assign(DeclarationKind::Property, Modifiers::PUBLIC).is_err());
    }

    #[test]
    fn abstract_static_constant_reports_allowed_set() {
        let mut slot = ModifierSlot::default();
        let err = slot
            .assign(
                DeclarationKind::Constant,
                Modifiers::EXPLICIT_ABSTRACT | Modifiers::STATIC,
            )
            .err();
        let Some(err) = err else {
            panic!("abstract static constant must be rejected");
        };
        assert_eq!(
            err.to_string(),
            "Invalid constant modifier given, allowed modifiers are \
             IS_PUBLIC, IS_PROTECTED, IS_PRIVATE and IS_FINAL."
        );
        assert!(!slot.is_assigned());
    }

    #[test]
    fn field_rejects_final() {
        let err = DeclarationKind::Property.validate(Modifiers::FINAL);
        let Err(err) = err else {
            panic!("final field must be rejected");
        };
        assert_eq!(
            err.to_string(),
            "Invalid field modifier given, allowed modifiers are \
             IS_PUBLIC, IS_PROTECTED, IS_PRIVATE, IS_STATIC and IS_READONLY."
        );
    }

    #[test]
    fn class_rejects_visibility() {
        assert!(matches!(
            DeclarationKind::Class.validate(Modifiers::PUBLIC),
            Err(ModifierError::Invalid { .. })
        ));
    }

    #[test]
    fn conflicting_visibility_rejected() {
        assert!(matches!(
            DeclarationKind::Method.validate(Modifiers::PUBLIC | Modifiers::PRIVATE),
            Err(ModifierError::Conflicting { .. })
        ));
    }

    #[test]
    fn abstract_final_rejected() {
        assert!(matches!(
            DeclarationKind::Class.validate(Modifiers::EXPLICIT_ABSTRACT | Modifiers::FINAL),
            Err(ModifierError::Conflicting { .. })
        ));
    }

    #[test]
    fn fixed_slot_rejects_assignment() {
        let mut slot = ModifierSlot::fixed(Modifiers::IMPLICIT_ABSTRACT);
        assert!(slot.get().is_abstract());
        assert!(slot
            .assign(DeclarationKind::Interface, Modifiers::IMPLICIT_ABSTRACT)
            .is_err());
    }

    #[test]
    fn with_visibility_replaces_only_visibility() {
        let mods = Modifiers::PUBLIC | Modifiers::STATIC;
        let changed = mods.with_visibility(Modifiers::PRIVATE);
        assert_eq!(changed, Modifiers::PRIVATE | Modifiers::STATIC);
    }
}
