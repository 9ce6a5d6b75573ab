use std::fmt;
use std::sync::Arc;

use crate::animation::ease::Ease;
use crate::foundation::core::TargetId;
use crate::style::parse::StyleMap;

/// Completion callback, invoked with the run's target set.
#[derive(Clone)]
pub struct Callback {
    label: Option<Arc<str>>,
    f: Arc<dyn Fn(&[TargetId]) + Send + Sync>,
}

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&[TargetId]) + Send + Sync + 'static) -> Self {
        Self {
            label: None,
            f: Arc::new(f),
        }
    }

    /// Wrap a closure and give it a label for logs and debug output.
    pub fn labeled(label: impl Into<String>, f: impl Fn(&[TargetId]) + Send + Sync + 'static) -> Self {
        Self {
            label: Some(Arc::from(label.into())),
            f: Arc::new(f),
        }
    }

    /// Label given at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Invoke the callback.
    pub fn call(&self, targets: &[TargetId]) {
        (self.f)(targets);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Callback({label})"),
            None => f.write_str("Callback(..)"),
        }
    }
}

/// One classified input token, consumed in order by the compiler.
#[derive(Clone, Debug)]
pub enum Instruction {
    /// Property values declared for a new step.
    StyleSnapshot(StyleMap),
    /// Explicit length of the next finalized step, in milliseconds.
    Duration(u64),
    /// Easing applied to transitions that end at the next step.
    Easing(Ease),
    /// Callback dispatched when the step being composed is reached.
    Callback(Callback),
}
