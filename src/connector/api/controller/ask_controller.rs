use anyhow::Result;

use super::super::Container;

/// One-shot request: a fresh conversation, one reply.
pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, text: String) -> Result<String> {
        let handler = self.container.handle_request_use_case();
        let mut state = handler.new_state();

        let reply = handler.execute(&mut state, &text).await?;
        Ok(reply.map(|r| r.text().to_string()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::connector::adapter::ScriptedJokeGenerator;
    use crate::connector::api::ContainerConfig;
    use crate::domain::NO_TOPIC_REPLY;

    fn container(generator: ScriptedJokeGenerator) -> Container {
        Container::with_generator(ContainerConfig::default(), Arc::new(generator))
    }

    #[tokio::test]
    async fn asks_for_a_joke() {
        let container = container(ScriptedJokeGenerator::new().then_joke("Knock knock."));
        let output = AskController::new(&container).ask("doors".to_string()).await.unwrap();
        assert_eq!(output, "Knock knock.");
    }

    #[tokio::test]
    async fn one_more_has_nothing_to_repeat() {
        let container = container(ScriptedJokeGenerator::new());
        let output = AskController::new(&container)
            .ask("one more".to_string())
            .await
            .unwrap();
        assert_eq!(output, NO_TOPIC_REPLY);
    }

    #[tokio::test]
    async fn blank_request_prints_nothing() {
        let container = container(ScriptedJokeGenerator::new());
        let output = AskController::new(&container).ask("  ".to_string()).await.unwrap();
        assert!(output.is_empty());
    }
}
