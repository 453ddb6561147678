pub mod langgraph;
pub mod runtime;
pub mod service_adapter;

pub use langgraph::LangGraphAgent;
pub use runtime::AgentRuntime;
pub use service_adapter::{EmptyAdapter, ServiceAdapter};
