//! Host type identities.
//!
//! A `ClassId` names one host type. Identities below `ClassId::FIRST_USER`
//! are reserved for the well-known types every host provides; any
//! `HostReflector` implementation must report them under these ids.

/// Identity of a host type.
///
/// Cheap to copy and compare. The meaning of an id is owned by the
/// `HostReflector` that handed it out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// The universal base type.
    pub const OBJECT: ClassId = ClassId(0);
    /// The metatype: the type of a type.
    pub const CLASS: ClassId = ClassId(1);
    pub const STRING: ClassId = ClassId(2);

    // Primitives
    pub const VOID: ClassId = ClassId(3);
    pub const BOOLEAN: ClassId = ClassId(4);
    pub const BYTE: ClassId = ClassId(5);
    pub const SHORT: ClassId = ClassId(6);
    pub const INT: ClassId = ClassId(7);
    pub const LONG: ClassId = ClassId(8);
    pub const FLOAT: ClassId = ClassId(9);
    pub const DOUBLE: ClassId = ClassId(10);
    pub const CHAR: ClassId = ClassId(11);

    // Boxed forms that matter to bean-property synthesis
    pub const BOXED_VOID: ClassId = ClassId(12);
    pub const BOXED_BOOLEAN: ClassId = ClassId(13);

    // Arrays
    pub const OBJECT_ARRAY: ClassId = ClassId(14);
    pub const STRING_ARRAY: ClassId = ClassId(15);

    /// First id available for host-defined types.
    pub const FIRST_USER: u32 = 16;

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    /// `void` or `Void`.
    #[inline]
    pub const fn is_void(self) -> bool {
        self.0 == Self::VOID.0 || self.0 == Self::BOXED_VOID.0
    }

    /// `boolean` or `Boolean`.
    #[inline]
    pub const fn is_boolean(self) -> bool {
        self.0 == Self::BOOLEAN.0 || self.0 == Self::BOXED_BOOLEAN.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 >= Self::VOID.0 && self.0 <= Self::CHAR.0
    }
}

/// Identity of a type variable declared by a generic host type.
///
/// Two occurrences of the same declared variable compare equal; the name and
/// bound live with the declaring type (see `HostReflector::type_params`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar {
    pub owner: ClassId,
    pub index: u16,
}

impl TypeVar {
    #[inline]
    pub const fn new(owner: ClassId, index: u16) -> Self {
        TypeVar { owner, index }
    }
}

/// Broad category of a host type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Primitive,
    Array { component: ClassId },
}

impl ClassKind {
    #[inline]
    pub const fn is_array(self) -> bool {
        matches!(self, ClassKind::Array { .. })
    }

    #[inline]
    pub const fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface)
    }
}
