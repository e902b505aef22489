//! Given-When-Then testing for reducers
//!
//! Reducers are pure, so most store behaviour can be checked without a
//! runtime: seed a state, feed one or more actions, inspect the final state
//! and the effects the last action returned.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use tamil_tours_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use tamil_tours_testing::ReducerTest;
///
/// ReducerTest::new(CatalogReducer::new())
///     .with_env(())
///     .given_state(CatalogState::new(tours))
///     .when_action(CatalogAction::FilterByCategory { filter: CategoryFilter::All })
///     .then_state(|state| {
///         assert_eq!(state.filtered.len(), state.tours.len());
///     })
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add an action to reduce (When)
    ///
    /// Can be called repeatedly; actions are reduced in order.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add several actions to reduce in order (When)
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = A>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects returned by the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, environment, or at least one action is not
    /// set, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use tamil_tours_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect other than `Effect::None` is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tamil_tours_core::{smallvec, SmallVec};

    #[derive(Clone, Debug, Default)]
    struct WishlistState {
        tour_ids: Vec<String>,
    }

    #[derive(Clone, Debug)]
    enum WishlistAction {
        Add(String),
        Clear,
        Sync,
    }

    struct WishlistReducer;

    impl Reducer for WishlistReducer {
        type State = WishlistState;
        type Action = WishlistAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                WishlistAction::Add(id) => {
                    state.tour_ids.push(id);
                    smallvec![Effect::None]
                },
                WishlistAction::Clear => {
                    state.tour_ids.clear();
                    SmallVec::new()
                },
                WishlistAction::Sync => smallvec![Effect::future(async { None })],
            }
        }
    }

    #[test]
    fn single_action_updates_state() {
        ReducerTest::new(WishlistReducer)
            .with_env(())
            .given_state(WishlistState::default())
            .when_action(WishlistAction::Add("1".to_string()))
            .then_state(|state| {
                assert_eq!(state.tour_ids, vec!["1".to_string()]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn actions_are_reduced_in_order() {
        ReducerTest::new(WishlistReducer)
            .with_env(())
            .given_state(WishlistState::default())
            .when_actions([
                WishlistAction::Add("1".to_string()),
                WishlistAction::Clear,
                WishlistAction::Add("2".to_string()),
            ])
            .then_state(|state| {
                assert_eq!(state.tour_ids, vec!["2".to_string()]);
            })
            .run();
    }

    #[test]
    fn effects_come_from_last_action() {
        ReducerTest::new(WishlistReducer)
            .with_env(())
            .given_state(WishlistState::default())
            .when_action(WishlistAction::Add("1".to_string()))
            .when_action(WishlistAction::Sync)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn no_effects_accepts_empty_and_none() {
        assertions::assert_no_effects::<WishlistAction>(&[Effect::None]);
        assertions::assert_no_effects::<WishlistAction>(&[]);
    }
}
