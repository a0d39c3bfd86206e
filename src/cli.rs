//! 命令行参数定义

use clap::{Parser, Subcommand};

/// docugen - 根据项目 URL 生成结构化项目文档
#[derive(Parser, Debug)]
#[command(name = "docugen")]
#[command(about = "Generate structured project documentation from a project URL")]
#[command(version)]
pub struct Cli {
    /// 显示详细日志
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 为一个项目 URL 生成文档
    Generate {
        url: String,
        /// 以 JSON 输出文档
        #[arg(long)]
        json: bool,
    },
    /// 列出最近的历史记录
    History,
    /// 重新生成一条历史记录
    Rerun {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// 删除一条历史记录
    Remove { id: String },
    /// 清空历史记录
    Clear,
}
