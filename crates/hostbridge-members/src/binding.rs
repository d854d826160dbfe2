//! Invocable and accessible member bindings.

use crate::signature::Signature;
use hostbridge_types::{ClassId, Executable, FieldDecl, HostObject, HostResult};
use std::fmt;
use std::sync::Arc;

/// One overload candidate.
///
/// Immutable; merge produces new bindings instead of editing existing ones.
#[derive(Clone)]
pub struct CallableBinding {
    executable: Arc<Executable>,
    signature: Signature,
    hidden: bool,
    bean: Option<Arc<str>>,
}

impl CallableBinding {
    pub fn new(executable: Arc<Executable>, signature: Signature) -> Self {
        let hidden = executable.hidden;
        CallableBinding {
            executable,
            signature,
            hidden,
            bean: None,
        }
    }

    pub(crate) fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn with_bean(mut self, bean: Option<Arc<str>>) -> Self {
        self.bean = bean;
        self
    }

    #[inline]
    pub fn executable(&self) -> &Arc<Executable> {
        &self.executable
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Excluded from the dynamic surface.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The property this binding was synthesized for, if any.
    #[inline]
    pub fn bean_name(&self) -> Option<&str> {
        self.bean.as_deref()
    }

    pub(crate) fn bean(&self) -> Option<&Arc<str>> {
        self.bean.as_ref()
    }

    #[inline]
    pub fn declaring(&self) -> ClassId {
        self.executable.declaring
    }

    pub fn invoke(
        &self,
        receiver: Option<&HostObject>,
        args: &[Option<HostObject>],
    ) -> HostResult<Option<HostObject>> {
        self.executable.invoke(receiver, args)
    }
}

impl fmt::Debug for CallableBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableBinding")
            .field("name", &self.executable.name)
            .field("declaring", &self.executable.declaring)
            .field("signature", &self.signature)
            .field("hidden", &self.hidden)
            .field("bean", &self.bean)
            .finish()
    }
}

/// A visible field.
#[derive(Clone)]
pub struct FieldBinding {
    field: Arc<FieldDecl>,
    is_final: bool,
}

impl FieldBinding {
    pub fn new(field: Arc<FieldDecl>) -> Self {
        let is_final = field.is_final();
        FieldBinding { field, is_final }
    }

    #[inline]
    pub fn field(&self) -> &Arc<FieldDecl> {
        &self.field
    }

    /// Final fields are read-only.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    #[inline]
    pub fn declaring(&self) -> ClassId {
        self.field.declaring
    }

    pub fn get(&self, receiver: Option<&HostObject>) -> HostResult<Option<HostObject>> {
        self.field.access.get(receiver)
    }

    pub fn set(&self, receiver: Option<&HostObject>, value: Option<HostObject>) -> HostResult<()> {
        self.field.access.set(receiver, value)
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.field.name)
            .field("declaring", &self.field.declaring)
            .field("is_final", &self.is_final)
            .finish()
    }
}
