//! 本地替身分析服务
//!
//! 未配置真实后端时使用：只根据 URL 的主机名合成一份完整文档，
//! 并保留与真实服务相同的调用延迟，状态机的时序不变。

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, Utc};
use reqwest::Url;
use tracing::warn;

use crate::config::Config;
use crate::error::AnalysisServiceError;
use crate::models::{
    AnalysisTicket, Appendix, Conclusion, DocumentationRecord, ProjectIntroduction,
    ProjectMethodology, SystemDesign, TestingAndResults,
};
use crate::services::AnalysisService;

pub struct MockAnalysisService {
    analyze_delay: Duration,
    generate_delay: Duration,
}

impl MockAnalysisService {
    pub fn new(config: &Config) -> Self {
        Self {
            analyze_delay: Duration::from_millis(config.mock_analyze_delay_ms),
            generate_delay: Duration::from_millis(config.mock_generate_delay_ms),
        }
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn analyze(&self, url: &str) -> Result<AnalysisTicket, AnalysisServiceError> {
        warn!("[MOCK MODE] 模拟分析请求: {}", url);
        tokio::time::sleep(self.analyze_delay).await;

        let label = host_label(url)?;
        let project_name = if label.is_empty() {
            "mock-project".to_string()
        } else {
            label
        };

        Ok(AnalysisTicket {
            analysis_id: format!("mock-{}", Utc::now().timestamp_millis()),
            project_name,
        })
    }

    async fn generate(
        &self,
        _analysis_id: &str,
        url: &str,
    ) -> Result<DocumentationRecord, AnalysisServiceError> {
        warn!("[MOCK MODE] 模拟文档生成");
        tokio::time::sleep(self.generate_delay).await;

        let label = host_label(url)?;
        Ok(mock_record(url, &label))
    }
}

/// 主机名的第一段（去掉开头的 `www.`），小写
pub fn host_label(url: &str) -> Result<String, AnalysisServiceError> {
    let invalid = || AnalysisServiceError::InvalidUrl {
        url: url.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    let host = parsed.host_str().ok_or_else(invalid)?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    Ok(host.split('.').next().unwrap_or_default().to_lowercase())
}

/// 首字母大写
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn mock_record(url: &str, label: &str) -> DocumentationRecord {
    let name = capitalize(label);

    DocumentationRecord {
        project_name: name.clone(),
        project_url: url.to_string(),
        generation_date: Local::now().format("%-m/%-d/%Y").to_string(),
        executive_summary: format!(
            "This document gives an overview of the {label} project. The project delivers a \
             responsive web application built on a modular component architecture, and it \
             addresses the usual challenges around state management and asynchronous data loading."
        ),
        project_introduction: ProjectIntroduction {
            problem_statement: format!(
                "Users of {name} previously relied on fragmented tools for their daily workflow, \
                 which cost time and introduced errors."
            ),
            proposed_solution: format!(
                "{name} provides a single web interface that brings the core workflow together \
                 and removes the manual hand-offs between tools."
            ),
            goals_and_objectives: "Primary goal: ship a fully functional web application.\n\
                 - Specific: single page application with authentication.\n\
                 - Measurable: pages load in under two seconds.\n\
                 - Time-bound: delivered within one development cycle."
                .to_string(),
            scope: "In scope: registration, core features, responsive layout.\n\
                 Out of scope: native mobile clients, analytics dashboards."
                .to_string(),
            target_audience: "Professionals who need an efficient, browser-based tool and \
                 expect a fast and predictable interface."
                .to_string(),
        },
        project_methodology: ProjectMethodology {
            development_approach: "Iterative development in short cycles with continuous \
                 feedback from early users."
                .to_string(),
            tools_and_technologies: "Frontend: component framework, typed language, utility CSS\n\
                 API communication: HTTP/JSON\n\
                 Build tooling: modern bundler"
                .to_string(),
            requirements_analysis: "Functional: authentication, CRUD operations, live updates.\n\
                 Non-functional: performance, accessibility, cross-browser support."
                .to_string(),
        },
        system_design: SystemDesign {
            system_architecture: "Client-server architecture: a single page application talks \
                 to a REST backend that owns persistence and business rules."
                .to_string(),
            module_descriptions: "Authentication module: login, registration and sessions.\n\
                 Dashboard module: main view for data and interaction.\n\
                 Integration module: all communication with external services."
                .to_string(),
            database_design: "Relational model with users, projects and tasks; foreign keys \
                 keep the entities consistent."
                .to_string(),
            interface_design: "Minimal interface with a consistent colour scheme and \
                 typographic hierarchy."
                .to_string(),
            code_samples: "// Code Sample: fetching user data\n\
                 async function fetchUser(id) {\n  \
                   const response = await api.get(`/users/${id}`);\n  \
                   return response.data;\n\
                 }"
            .to_string(),
        },
        testing_and_results: TestingAndResults {
            testing_strategy: "Unit tests for components, integration tests for user flows \
                 and end-to-end tests for the full application."
                .to_string(),
            test_results: "All critical user flows pass; performance targets are met.".to_string(),
            project_accomplishments: format!(
                "{name} reached a production-ready state covering all primary requirements."
            ),
        },
        conclusion: Conclusion {
            summary_of_achievements: "The project delivered a maintainable, performant \
                 application on schedule."
                .to_string(),
            challenges_and_limitations: "Real-time synchronisation required extra work; \
                 offline support is not available yet."
                .to_string(),
            future_enhancements: "Short term: offline caching.\n\
                 Medium term: mobile companion app.\n\
                 Long term: personalised recommendations."
                .to_string(),
        },
        appendix: Appendix {
            code_repository: format!("The source code is available at: {url}"),
            references: "Framework documentation, MDN Web Docs.".to_string(),
            glossary: "SPA: Single Page Application.".to_string(),
        },
    }
}
