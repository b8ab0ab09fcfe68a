//! Scenario definition, builder and runner.

use kestrel_graph::GraphConfig;
use kestrel_session::{Session, SessionResult, StatementResult};

use crate::assertion::{Assertion, AssertionBuilder};
use crate::error::ScenarioResult;

type Statement = Box<dyn Fn(&mut Session) -> SessionResult<StatementResult>>;

/// A step in a scenario: one statement and the assertion on its result.
pub struct Step {
    /// Step name (for reporting).
    pub name: String,
    statement: Statement,
    /// Assertion to verify the result.
    pub assertion: Assertion,
}

/// A sequence of statements run against one session.
pub struct Scenario {
    /// Scenario name (for reporting).
    name: String,
    config: GraphConfig,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create a new scenario with the given name.
    ///
    /// Scenarios run with index verification on.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: GraphConfig::strict(),
            steps: Vec::new(),
        }
    }

    /// Run against a graph with this configuration instead.
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a step with an assertion.
    pub fn step<S, F>(mut self, name: impl Into<String>, statement: S, assertion_fn: F) -> Self
    where
        S: Fn(&mut Session) -> SessionResult<StatementResult> + 'static,
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        let assertion = assertion_fn(AssertionBuilder::new()).build();
        self.steps.push(Step {
            name: name.into(),
            statement: Box::new(statement),
            assertion,
        });
        self
    }

    /// Get the scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order on a fresh session and return the session
    /// for further inspection.
    pub fn run(&self) -> ScenarioResult<Session> {
        let mut session = Session::with_config(self.config.clone());
        self.run_on(&mut session)?;
        Ok(session)
    }

    /// Run every step in order on an existing session.
    pub fn run_on(&self, session: &mut Session) -> ScenarioResult<()> {
        for step in &self.steps {
            let result = (step.statement)(session).map_err(|e| e.to_string());
            step.assertion.verify(&step.name, session.graph(), &result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_pattern::{NodePattern, PathPattern};

    fn critic() -> PathPattern {
        PathPattern::start(NodePattern::named("robert").with_label("Critic"))
    }

    #[test]
    fn test_scenario_builder() {
        let scenario = Scenario::new("test")
            .step("merge", |s| s.merge(&critic()), |a| a.nodes_created(1))
            .step("again", |s| s.merge(&critic()), |a| a.no_changes());

        assert_eq!(scenario.name(), "test");
        assert_eq!(scenario.steps().len(), 2);
    }

    #[test]
    fn test_failed_step_names_the_step() {
        let scenario = Scenario::new("test").step(
            "wrong_count",
            |s| s.merge(&critic()),
            |a| a.nodes_created(2),
        );

        let err = scenario.run().err().map(|e| e.to_string()).unwrap_or_default();

        assert!(err.contains("wrong_count"), "{}", err);
    }
}
