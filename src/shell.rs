//! Interactive command loop driving a [`TaskRegistry`].

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::command::{Command, USAGE};
use crate::config::Config;
use crate::error::Result;
use crate::render;
use registry::TaskRegistry;

/// Messages produced by one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub messages: Vec<String>,
    pub exit: bool,
}

impl Reply {
    fn say(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

pub struct Shell {
    registry: TaskRegistry,
    config: Config,
}

impl Shell {
    pub fn new(registry: TaskRegistry, config: Config) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> TaskRegistry {
        self.registry
    }

    /// Applies one command. Rejections are reported in the reply; the
    /// registry is left consistent either way.
    pub fn execute(&mut self, command: Command) -> Reply {
        let mut reply = Reply::default();
        debug!("Executing {:?}", command);

        match command {
            Command::NewTask {
                id,
                priority,
                wait_key,
            } => match self.registry.create_waiting(id, priority, wait_key) {
                Ok(()) => reply.say(format!("Task {} created in wait state on {}", id, wait_key)),
                Err(e) => reply.say(e.to_string()),
            },
            Command::Delete { id } => match self.registry.delete_task(id) {
                Ok(true) => reply.say(format!("Task {} deleted", id)),
                Ok(false) => reply.say(format!("Task {} not found, nothing deleted", id)),
                Err(e) => reply.say(e.to_string()),
            },
            Command::Suspend { event_id } => match self.registry.suspend_running(event_id) {
                Ok(suspension) => {
                    reply.say(format!(
                        "Task {} moved from running to waiting state on {}",
                        suspension.suspended, event_id
                    ));
                    match suspension.promoted {
                        Some(id) => reply.say(format!("Task {} moved from ready to running state", id)),
                        None => reply.say(registry::RegistryError::EmptyReady.to_string()),
                    }
                }
                Err(e) => reply.say(e.to_string()),
            },
            Command::ReadyToWait { id, event_id } => {
                match self.registry.move_ready_to_waiting(id, event_id) {
                    Ok(()) => reply.say(format!(
                        "Task {} moved from ready to waiting state on {}",
                        id, event_id
                    )),
                    Err(e) => reply.say(e.to_string()),
                }
            }
            Command::Event { wait_key } => {
                let woken = self.registry.wake(wait_key);
                reply.say(format!(
                    "{} task(s) with wait id {} moved from wait to ready state",
                    woken.len(),
                    wait_key
                ));
                if let Some(swap) = self.registry.check_preemption() {
                    reply.say(format!("Task {} preempted task {}", swap.promoted, swap.demoted));
                } else if let Some(id) = self.registry.dispatch_idle() {
                    reply.say(format!("Task {} dispatched to running state", id));
                }
            }
            Command::Show => {}
            Command::Exit => reply.exit = true,
        }

        reply
    }

    /// Reads commands line by line until `x` or end of input, writing the
    /// replies and a rendering of the registry after each one.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        output
            .write_all(render::render(&self.registry, self.config.output)?.as_bytes())
            .await?;

        loop {
            if self.config.prompt {
                output.write_all(format!("\n{}: ", USAGE).as_bytes()).await?;
                output.flush().await?;
            }

            let Some(line) = lines.next_line().await? else {
                info!("End of input, leaving command loop");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let reply = match line.parse::<Command>() {
                Ok(command) => self.execute(command),
                Err(e) => Reply {
                    messages: vec![e.to_string()],
                    exit: false,
                },
            };

            let mut text = String::new();
            for message in &reply.messages {
                text.push_str(message);
                text.push('\n');
            }
            text.push_str(&render::render(&self.registry, self.config.output)?);
            output.write_all(text.as_bytes()).await?;
            output.flush().await?;

            if reply.exit {
                break;
            }
        }

        Ok(())
    }
}
