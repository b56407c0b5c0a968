//! CRUCIBLE - 材料识别对话助手
//!
//! 入口：初始化日志与配置，创建编排器，运行命令行对话循环
//! （exit/quit 退出，clear 清空历史，help 示例查询）。

use std::io::{BufRead, Write};

use anyhow::Context;
use crucible::chat::{Orchestrator, DEFAULT_SYSTEM_PROMPT};
use crucible::config::load_config;
use crucible::llm::create_llm_from_config;
use crucible::tools::{IdentifyMaterialTool, ToolRegistry};

const WELCOME: &str = "\
============================================================
CRUCIBLE - Material Identification Assistant
============================================================

Computational Repository for Unified Classification
and Interactive Base Learning Expert

I can identify materials from Raman spectroscopy data!

Commands:
  'exit' or 'quit' - Exit CRUCIBLE
  'clear'          - Clear conversation history
  'help'           - Show example queries
============================================================";

const HELP: &str = "\
Example queries:

1. \"Identify a material with peaks at 465 and 610 cm^-1,
    formation energy -11.2 eV/atom\"

2. \"I have Raman peaks at 144 and 399, what could it be?\"
   (I'll ask for the formation energy)

3. \"What material has peaks 520 and 950?\"
   (I'll ask for the missing data)

4. \"What is Raman spectroscopy?\"
   (I can answer general questions too!)

5. \"Tell me about Ceria\"
   (Ask about materials)";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    crucible::observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let llm = create_llm_from_config(&cfg);
    let usage_handle = llm.clone();

    let mut tools = ToolRegistry::new();
    tools.register(IdentifyMaterialTool::new());
    tracing::info!(tools = ?tools.tool_names(), provider = %cfg.llm.provider, "crucible ready");

    let system_prompt = cfg
        .app
        .system_prompt
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
    let mut orchestrator =
        Orchestrator::new(llm, tools, system_prompt, cfg.app.max_context_turns);

    println!("{WELCOME}\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("You: ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!("\nGoodbye!");
            break;
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("\nGoodbye! Keep exploring materials!");
                break;
            }
            "clear" => {
                orchestrator.reset();
                println!("Conversation history cleared.\n");
                continue;
            }
            "help" => {
                println!("{HELP}\n");
                continue;
            }
            _ => {}
        }

        match orchestrator.submit(input).await {
            Ok(reply) => println!("\nCRUCIBLE: {reply}\n"),
            Err(e) => eprintln!("\nError: {e}\n"),
        }
    }

    let (prompt, completion, total) = usage_handle.token_usage();
    if total > 0 {
        tracing::info!(prompt, completion, total, "session token usage");
    }

    Ok(())
}
