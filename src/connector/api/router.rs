use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, ServeController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    serve_controller: ServeController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            serve_controller: ServeController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { text } => self.ask_controller.ask(text).await,
            Commands::Chat => self.chat_controller.chat().await,
            Commands::Serve { port, public } => self.serve_controller.serve(port, public).await,
        }
    }
}
