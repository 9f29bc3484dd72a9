use std::io::Write;

use async_trait::async_trait;
use chrono::Local;
use serde_json::{json, Value};
use taskloom_core::api::{CompressedContext, TaskRecord, Worker};
use tokio::sync::Mutex;

/// Emits one `task.dispatch` JSON line per task instead of running it, for
/// piping into an external executor.
pub struct JsonlWorker {
    sink: Mutex<Box<dyn Write + Send>>,
    pretty_print: bool,
}

impl JsonlWorker {
    pub fn new(sink: Box<dyn Write + Send>, pretty_print: bool) -> Self {
        Self {
            sink: Mutex::new(sink),
            pretty_print,
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()), false)
    }

    fn event_to_json(task: &TaskRecord, context: &CompressedContext) -> Value {
        json!({
            "v": 1,
            "event_type": "task.dispatch",
            "ts": Local::now().to_rfc3339(),
            "task_id": task.task_id,
            "task": task,
            "context": context,
            "metadata": {
                "context_tokens": context.total_tokens,
                "components": context.components.len(),
                "budget_exceeded": context.budget_exceeded,
            }
        })
    }
}

#[async_trait]
impl Worker for JsonlWorker {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn execute(&self, task: &TaskRecord, context: &CompressedContext) -> anyhow::Result<String> {
        let event = Self::event_to_json(task, context);
        let line = if self.pretty_print {
            serde_json::to_string_pretty(&event)?
        } else {
            serde_json::to_string(&event)?
        };

        let mut sink = self.sink.lock().await;
        writeln!(sink, "{line}")?;
        sink.flush()?;
        Ok(format!("dispatched {}", task.task_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use taskloom_core::api::TaskType;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<StdMutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn writes_one_line_per_task() {
        let buf = SharedBuf::default();
        let worker = JsonlWorker::new(Box::new(buf.clone()), false);
        let context = CompressedContext::default();

        for id in ["task-1", "task-2"] {
            let task = TaskRecord::new(id, "Scan", TaskType::ProjectScan);
            worker.execute(&task, &context).await.unwrap();
        }

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event_type"], "task.dispatch");
        assert_eq!(lines[1]["task_id"], "task-2");
        assert_eq!(lines[0]["task"]["taskType"], "project-scan");
    }
}
