//! Agent System
//!
//! The agents are the only code that talks to the model API:
//!
//! - **File Analysis Agent**: classifies an upload and asks for a description
//!   of chart-worthy structure
//! - **Chart Data Agent**: asks for sample chart data and extracts JSON from
//!   the reply
//!
//! ## Pipeline Overview
//!
//! ```text
//! POST /upload                 POST /generate-chart
//!      │                              │
//!      ▼                              ▼
//! ┌─────────────┐              ┌─────────────┐
//! │    File     │  analysis    │ Chart Data  │  → ChartData
//! │  Analysis   │ ───────────▶ │   Agent     │
//! └─────────────┘  (via user)  └─────────────┘
//!                                     │
//!                                     ▼
//!                              HTML chart renderer
//! ```
//!
//! Both agents swallow collaborator failures and return a user-facing value.

pub mod file_analysis;
pub mod chart_data;

pub use file_analysis::{AnalysisStrategy, FileAnalysisAgent};
pub use chart_data::{ChartData, ChartDataAgent, ChartRequest};
