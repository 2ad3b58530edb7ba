use std::str::FromStr;

use crate::error::TaskSchedError;
use registry::{Priority, TaskId, WaitKey};

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewTask {
        id: TaskId,
        priority: Priority,
        wait_key: WaitKey,
    },
    Delete {
        id: TaskId,
    },
    Suspend {
        event_id: WaitKey,
    },
    ReadyToWait {
        id: TaskId,
        event_id: WaitKey,
    },
    Event {
        wait_key: WaitKey,
    },
    Show,
    Exit,
}

pub const USAGE: &str = "Enter command (n for new task, d for delete task, w to move from ready to wait state, s to suspend, e to trigger an event, p to show, x to exit)";

fn parse_args<const N: usize>(name: &str, args: &[&str]) -> Result<[i64; N], TaskSchedError> {
    if args.len() != N {
        return Err(TaskSchedError::InvalidCommand(format!(
            "'{}' takes {} argument(s), got {}",
            name,
            N,
            args.len()
        )));
    }

    let mut values = [0i64; N];
    for (slot, arg) in values.iter_mut().zip(args) {
        *slot = arg.parse().map_err(|_| {
            TaskSchedError::InvalidCommand(format!("'{}' is not an integer", arg))
        })?;
    }
    Ok(values)
}

impl FromStr for Command {
    type Err = TaskSchedError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| TaskSchedError::InvalidCommand("empty command".to_string()))?;
        let args: Vec<&str> = words.collect();

        let command = match name {
            "n" | "new" => {
                let [id, priority, wait_key] = parse_args::<3>(name, &args)?;
                Command::NewTask {
                    id,
                    priority,
                    wait_key,
                }
            }
            "d" | "delete" => {
                let [id] = parse_args::<1>(name, &args)?;
                Command::Delete { id }
            }
            "s" | "suspend" => {
                let [event_id] = parse_args::<1>(name, &args)?;
                Command::Suspend { event_id }
            }
            "w" | "wait" => {
                let [id, event_id] = parse_args::<2>(name, &args)?;
                Command::ReadyToWait { id, event_id }
            }
            "e" | "event" => {
                let [wait_key] = parse_args::<1>(name, &args)?;
                Command::Event { wait_key }
            }
            "p" | "show" => {
                parse_args::<0>(name, &args)?;
                Command::Show
            }
            "x" | "exit" | "quit" => Command::Exit,
            other => {
                return Err(TaskSchedError::InvalidCommand(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };

        Ok(command)
    }
}
