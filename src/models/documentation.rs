//! 文档数据模型
//!
//! 远端分析服务返回的结构化文档。所有字段都必须存在（允许空字符串），
//! 展示层按位置读取各章节，不做任何兜底。

use serde::{Deserialize, Serialize};

/// 第一次远端调用（analyze）的返回值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTicket {
    /// 分析任务 ID，传给第二次调用
    pub analysis_id: String,
    pub project_name: String,
}

/// 完整的项目文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationRecord {
    pub project_name: String,
    pub project_url: String,
    pub generation_date: String,
    pub executive_summary: String,
    pub project_introduction: ProjectIntroduction,
    pub project_methodology: ProjectMethodology,
    pub system_design: SystemDesign,
    pub testing_and_results: TestingAndResults,
    pub conclusion: Conclusion,
    pub appendix: Appendix,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIntroduction {
    pub problem_statement: String,
    pub proposed_solution: String,
    pub goals_and_objectives: String,
    pub scope: String,
    pub target_audience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMethodology {
    pub development_approach: String,
    pub tools_and_technologies: String,
    pub requirements_analysis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDesign {
    pub system_architecture: String,
    pub module_descriptions: String,
    pub database_design: String,
    pub interface_design: String,
    pub code_samples: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestingAndResults {
    pub testing_strategy: String,
    pub test_results: String,
    pub project_accomplishments: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conclusion {
    pub summary_of_achievements: String,
    pub challenges_and_limitations: String,
    pub future_enhancements: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appendix {
    pub code_repository: String,
    pub references: String,
    pub glossary: String,
}

/// 文档大纲中的一个章节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSection<'a> {
    /// 带编号的标题，例如 "2.3 Goals and Objectives"
    pub title: &'static str,
    /// 一级章节为 1，子章节为 2
    pub level: u8,
    /// 正文；只有标题的一级章节为 None
    pub body: Option<&'a str>,
}

impl<'a> OutlineSection<'a> {
    fn heading(title: &'static str) -> Self {
        Self {
            title,
            level: 1,
            body: None,
        }
    }

    fn top(title: &'static str, body: &'a str) -> Self {
        Self {
            title,
            level: 1,
            body: Some(body),
        }
    }

    fn sub(title: &'static str, body: &'a str) -> Self {
        Self {
            title,
            level: 2,
            body: Some(body),
        }
    }
}

impl DocumentationRecord {
    /// 按固定顺序列出所有章节
    ///
    /// 顺序和编号是固定的，展示层直接按位置渲染。
    pub fn outline(&self) -> Vec<OutlineSection<'_>> {
        let intro = &self.project_introduction;
        let method = &self.project_methodology;
        let design = &self.system_design;
        let testing = &self.testing_and_results;
        let conclusion = &self.conclusion;
        let appendix = &self.appendix;

        vec![
            OutlineSection::top("1. Executive Summary", &self.executive_summary),
            OutlineSection::heading("2. Project Introduction"),
            OutlineSection::sub("2.1 Problem Statement", &intro.problem_statement),
            OutlineSection::sub("2.2 Proposed Solution", &intro.proposed_solution),
            OutlineSection::sub("2.3 Goals and Objectives", &intro.goals_and_objectives),
            OutlineSection::sub("2.4 Scope", &intro.scope),
            OutlineSection::sub("2.5 Target Audience", &intro.target_audience),
            OutlineSection::heading("3. Project Methodology"),
            OutlineSection::sub("3.1 Development Approach", &method.development_approach),
            OutlineSection::sub("3.2 Tools and Technologies", &method.tools_and_technologies),
            OutlineSection::sub("3.3 Requirements Analysis", &method.requirements_analysis),
            OutlineSection::heading("4. System Design and Implementation"),
            OutlineSection::sub("4.1 System Architecture", &design.system_architecture),
            OutlineSection::sub("4.2 Module Descriptions", &design.module_descriptions),
            OutlineSection::sub("4.3 Database Design", &design.database_design),
            OutlineSection::sub("4.4 Interface Design", &design.interface_design),
            OutlineSection::sub("4.5 Code Samples", &design.code_samples),
            OutlineSection::heading("5. Testing and Results"),
            OutlineSection::sub("5.1 Testing Strategy", &testing.testing_strategy),
            OutlineSection::sub("5.2 Test Results", &testing.test_results),
            OutlineSection::sub("5.3 Project Accomplishments", &testing.project_accomplishments),
            OutlineSection::heading("6. Conclusion and Future Scope"),
            OutlineSection::sub("6.1 Summary of Achievements", &conclusion.summary_of_achievements),
            OutlineSection::sub("6.2 Challenges and Limitations", &conclusion.challenges_and_limitations),
            OutlineSection::sub("6.3 Future Enhancements", &conclusion.future_enhancements),
            OutlineSection::heading("7. Appendix"),
            OutlineSection::sub("7.1 Code Repository", &appendix.code_repository),
            OutlineSection::sub("7.2 References", &appendix.references),
            OutlineSection::sub("7.3 Glossary", &appendix.glossary),
        ]
    }

    /// 渲染为 Markdown 文本（CLI 输出用）
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "# {}\n\nComprehensive Project Documentation\n\nDate: {} | URL: {}\n",
            self.project_name, self.generation_date, self.project_url
        );

        for section in self.outline() {
            let hashes = "#".repeat(usize::from(section.level) + 1);
            out.push_str(&format!("\n{} {}\n", hashes, section.title));
            if let Some(body) = section.body {
                out.push_str(&format!("\n{}\n", body));
            }
        }

        out
    }
}
