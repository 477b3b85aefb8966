//! Enumerations shared by the model, with their positional wire codes and the
//! per-kind legality tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to map a wire code or a label onto an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KindError {
    /// Numeric code outside the enumeration.
    #[error("unknown {kind} code {code}")]
    UnknownCode { kind: &'static str, code: u8 },
    /// Label that names no variant.
    #[error("unknown {kind} '{text}'")]
    UnknownLabel { kind: &'static str, text: String },
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Positional wire code.
            #[must_use]
            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Canonical label, as accepted by [`FromStr`].
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = KindError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(KindError::UnknownCode { kind: $what, code }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }

        impl FromStr for $name {
            type Err = KindError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                let trimmed = text.trim();
                if let Ok(code) = trimmed.parse::<u8>() {
                    return Self::try_from(code);
                }
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.label().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| KindError::UnknownLabel {
                        kind: $what,
                        text: trimmed.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

wire_enum! {
    /// Kind of an I/O variable.
    IoKind, "io kind" {
        DigitalInput = 0 => "digitalInput",
        DigitalOutput = 1 => "digitalOutput",
        AnalogInput = 2 => "analogInput",
        SoftVariable = 3 => "softVariable",
        Timer = 4 => "timer",
    }
}

wire_enum! {
    /// Operation mode of an I/O variable.
    OperationMode, "operation mode" {
        None = 0 => "none",
        StartDelay = 1 => "startDelay",
        AutoOff = 2 => "autoOff",
        OneShot = 3 => "oneShot",
        Repeating = 4 => "repeating",
    }
}

wire_enum! {
    /// Test a condition applies to its target.
    Comparison, "comparison" {
        IsTrue = 0 => "isTrue",
        IsFalse = 1 => "isFalse",
        IsEqual = 2 => "isEqual",
        IsLess = 3 => "isLess",
        IsGreater = 4 => "isGreater",
        FlagIsTrue = 5 => "flagIsTrue",
        FlagIsFalse = 6 => "flagIsFalse",
    }
}

wire_enum! {
    /// Operation an action performs on its target.
    ActionKind, "action" {
        Set = 0 => "set",
        Reset = 1 => "reset",
        SetValue = 2 => "setValue",
        Increment = 3 => "increment",
        Decrement = 4 => "decrement",
        SetFlag = 5 => "setFlag",
        Clear = 6 => "clear",
    }
}

wire_enum! {
    /// Operator combining the members of a group.
    Logic, "logic" {
        And = 0 => "and",
        Or = 1 => "or",
    }
}

impl Default for Logic {
    fn default() -> Self {
        Self::And
    }
}

impl IoKind {
    /// Short prefix used when naming a variable, e.g. `DO2`.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::DigitalInput => "DI",
            Self::DigitalOutput => "DO",
            Self::AnalogInput => "AI",
            Self::SoftVariable => "SV",
            Self::Timer => "TM",
        }
    }

    /// Look a kind up by its [`prefix`](Self::prefix), case-insensitively.
    #[must_use]
    pub fn from_prefix(text: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.prefix().eq_ignore_ascii_case(text))
    }

    /// Operation modes a variable of this kind may use.
    #[must_use]
    pub fn legal_modes(self) -> &'static [OperationMode] {
        use OperationMode as M;
        match self {
            Self::DigitalOutput => &[M::None, M::StartDelay, M::AutoOff],
            Self::Timer => &[M::OneShot, M::Repeating],
            Self::DigitalInput | Self::AnalogInput | Self::SoftVariable => &[M::None],
        }
    }

    /// Comparisons a condition targeting this kind may use.
    #[must_use]
    pub fn legal_comparisons(self) -> &'static [Comparison] {
        use Comparison as C;
        match self {
            Self::DigitalInput | Self::DigitalOutput => {
                &[C::IsTrue, C::IsFalse, C::FlagIsTrue, C::FlagIsFalse]
            }
            Self::AnalogInput => &[
                C::IsEqual,
                C::IsLess,
                C::IsGreater,
                C::FlagIsTrue,
                C::FlagIsFalse,
            ],
            Self::SoftVariable | Self::Timer => Comparison::ALL,
        }
    }

    /// Actions permitted on a target of this kind.
    #[must_use]
    pub fn legal_actions(self) -> &'static [ActionKind] {
        use ActionKind as A;
        match self {
            Self::DigitalInput | Self::AnalogInput => &[A::SetFlag, A::Clear],
            Self::DigitalOutput => &[A::Set, A::Reset, A::SetFlag, A::Clear],
            Self::SoftVariable => ActionKind::ALL,
            Self::Timer => &[A::Set, A::Reset, A::SetValue, A::Clear],
        }
    }

    #[must_use]
    pub fn admits_mode(self, mode: OperationMode) -> bool {
        self.legal_modes().contains(&mode)
    }

    #[must_use]
    pub fn admits_comparison(self, comparison: Comparison) -> bool {
        self.legal_comparisons().contains(&comparison)
    }

    #[must_use]
    pub fn admits_action(self, action: ActionKind) -> bool {
        self.legal_actions().contains(&action)
    }

    /// Mode given to freshly created variables of this kind.
    #[must_use]
    pub fn default_mode(self) -> OperationMode {
        self.legal_modes()[0]
    }
}

impl Comparison {
    /// Whether the comparison reads the condition's `value`.
    #[must_use]
    pub fn takes_value(self) -> bool {
        matches!(self, Self::IsEqual | Self::IsLess | Self::IsGreater)
    }
}

impl ActionKind {
    /// Whether the action reads the action's `value`.
    #[must_use]
    pub fn takes_value(self) -> bool {
        matches!(self, Self::SetValue | Self::Increment | Self::Decrement)
    }
}
