use rand::Rng;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AgentPoolError {
    #[error("agent pool must contain at least one phone number")]
    Empty,
}

/// Phone numbers of the sales agents eligible to receive lead notifications.
/// Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentPool {
    numbers: Vec<String>,
}

impl AgentPool {
    pub fn new<I, S>(numbers: I) -> Result<Self, AgentPoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let numbers: Vec<String> = numbers
            .into_iter()
            .map(Into::<String>::into)
            .map(|number| number.trim().to_string())
            .filter(|number| !number.is_empty())
            .collect();

        if numbers.is_empty() {
            return Err(AgentPoolError::Empty);
        }

        Ok(Self { numbers })
    }

    /// Parses a comma-separated list such as `+31600000001,+31600000002`.
    pub fn parse(raw: &str) -> Result<Self, AgentPoolError> {
        Self::new(raw.split(','))
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn numbers(&self) -> &[String] {
        &self.numbers
    }

    pub fn pick(&self) -> &str {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng>(&self, rng: &mut R) -> &str {
        let index = rng.gen_range(0..self.numbers.len());
        &self.numbers[index]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};

    use crate::domain::agent::{AgentPool, AgentPoolError};

    #[test]
    fn parse_trims_and_drops_blank_entries() {
        let pool = AgentPool::parse(" +1000 , ,+2000,").expect("pool has numbers");

        assert_eq!(pool.numbers(), ["+1000".to_string(), "+2000".to_string()]);
    }

    #[test]
    fn blank_list_is_rejected() {
        assert_eq!(AgentPool::parse(" , ").expect_err("no numbers"), AgentPoolError::Empty);
        assert_eq!(AgentPool::parse("").expect_err("no numbers"), AgentPoolError::Empty);
    }

    #[test]
    fn single_agent_is_always_picked() {
        let pool = AgentPool::parse("+1000").expect("pool has numbers");

        for _ in 0..32 {
            assert_eq!(pool.pick(), "+1000");
        }
    }

    #[test]
    fn selection_is_roughly_uniform() {
        let pool = AgentPool::parse("+1000,+2000,+3000,+4000").expect("pool has numbers");
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 40_000;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(pool.pick_with(&mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 4);
        for number in pool.numbers() {
            let frequency = counts[number.as_str()] as f64 / trials as f64;
            assert!(
                (0.23..0.27).contains(&frequency),
                "agent {number} picked with frequency {frequency}"
            );
        }
    }
}
