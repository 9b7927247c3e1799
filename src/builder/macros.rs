//! Macros for ergonomic state machine construction.

/// Generate a `State` implementation for a plain enum alphabet.
///
/// # Example
///
/// ```
/// use maestro::core::State;
/// use maestro::state_enum;
///
/// state_enum! {
///     pub enum Shutter {
///         Closed,
///         Opening,
///         Open,
///         Jammed,
///     }
///     holding: [Jammed]
/// }
///
/// assert_eq!(Shutter::all().len(), 4);
/// assert!(Shutter::Jammed.is_holding());
/// assert_eq!(Shutter::from_name("Open"), Some(Shutter::Open));
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(holding: [$($holding:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn all() -> Vec<Self> {
                vec![$(Self::$variant),*]
            }

            fn is_holding(&self) -> bool {
                match self {
                    $($(Self::$holding => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Idle,
            Running,
            Faulted,
        }
        holding: [Faulted]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert!(!TestState::Running.is_holding());
        assert!(TestState::Faulted.is_holding());
        assert_eq!(
            TestState::all(),
            vec![TestState::Idle, TestState::Running, TestState::Faulted]
        );
        assert_eq!(TestState::Faulted.to_string(), "Faulted");
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
            holding: [B]
        }

        let _state = PublicState::A;
    }

    #[test]
    fn state_enum_works_without_holding_list() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        assert!(!MinimalState::One.is_holding());
        assert_eq!(MinimalState::from_name("Two"), Some(MinimalState::Two));
    }
}
