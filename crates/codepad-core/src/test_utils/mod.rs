pub mod mock_gemini_server;
pub mod mock_judge_server;
pub mod scripted;

pub use mock_gemini_server::MockGeminiServer;
pub use mock_judge_server::MockJudgeServer;
pub use scripted::{snapshot, ScriptedJudge, ScriptedLLM};
