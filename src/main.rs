// ==========================================
// 奖学金数据交换引擎 - 命令行入口
// ==========================================
// 用法:
//   scholarship-interchange export <data.json> <format> [--type T] [--anonymize] [--out DIR]
//   scholarship-interchange import <payload> <existing.json> [--strategy S] [--keep-progress]
// 导出结果写入建议文件名；导入结果以 JSON 输出到 stdout
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use scholarship_interchange::config::ConfigManager;
use scholarship_interchange::domain::ExportOptions;
use scholarship_interchange::importer::payload_from_file;
use scholarship_interchange::{
    logging, ExportFormat, ExportRequest, ExportSerializer, ExportSource, ExportType,
    ImportOptions, ImportOrchestrator, ImportRequest, InterchangeConfigReader, MergeStrategy,
};
use std::path::PathBuf;

const USAGE: &str = "用法:
  scholarship-interchange export <data.json> <format> [--type full-backup|template|portfolio] [--anonymize] [--out DIR]
  scholarship-interchange import <payload> <existing.json> [--strategy replace|merge|skip-duplicates] [--keep-progress] [--manual]";

fn load_config() -> Result<ConfigManager> {
    match ConfigManager::default_path() {
        Some(path) => ConfigManager::load(&path)
            .map_err(|e| anyhow!("配置加载失败 {}: {}", path.display(), e)),
        None => Ok(ConfigManager::new()),
    }
}

/// 取出 `--flag value` 形式的参数
fn take_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => {
            if i + 1 >= args.len() {
                bail!("{} 缺少参数值", flag);
            }
            let value = args.remove(i + 1);
            args.remove(i);
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    match args.iter().position(|a| a == flag) {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    }
}

fn run_export(mut args: Vec<String>, config: &ConfigManager) -> Result<()> {
    let export_type = match take_value(&mut args, "--type")? {
        Some(label) => {
            ExportType::from_label(&label).ok_or_else(|| anyhow!("未知导出类型: {}", label))?
        }
        None => ExportType::FullBackup,
    };
    let anonymize = take_flag(&mut args, "--anonymize");
    let out_dir = take_value(&mut args, "--out")?
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let [data_path, format] = args.as_slice() else {
        bail!("{}", USAGE);
    };
    let format: ExportFormat = format.parse()?;

    let source = ExportSource::load(data_path)
        .with_context(|| format!("读取数据源失败: {}", data_path))?;

    let options = ExportOptions {
        anonymize_data: anonymize,
        ..ExportOptions::all()
    };
    let mut request = ExportRequest::new(&source.scholarships, export_type)
        .with_goals(&source.goals)
        .with_options(options);
    if let Some(profile) = &source.profile {
        request = request.with_profile(profile);
    }

    let payload = ExportSerializer::from_config(config).export(&request, format)?;
    let target = out_dir.join(&payload.filename);
    std::fs::write(&target, &payload.content)
        .with_context(|| format!("写入失败: {}", target.display()))?;

    println!("{}", target.display());
    Ok(())
}

fn run_import(mut args: Vec<String>, config: &ConfigManager) -> Result<()> {
    let merge_strategy = match take_value(&mut args, "--strategy")? {
        Some(label) => MergeStrategy::from_label(&label)
            .ok_or_else(|| anyhow!("未知合并策略: {}", label))?,
        None => config.get_default_merge_strategy(),
    };
    let options = ImportOptions {
        merge_strategy,
        preserve_existing_progress: take_flag(&mut args, "--keep-progress"),
        auto_resolve_conflicts: !take_flag(&mut args, "--manual"),
    };

    let [payload_path, existing_path] = args.as_slice() else {
        bail!("{}", USAGE);
    };

    let payload = payload_from_file(payload_path)?;
    let existing = ExportSource::load(existing_path)
        .with_context(|| format!("读取现有记录失败: {}", existing_path))?;

    let request = ImportRequest::new(&payload, &existing.scholarships)
        .with_goals(&existing.goals)
        .with_options(options);
    let outcome = ImportOrchestrator::from_config(config).run(&request);

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if !outcome.success {
        bail!("导入被拒绝（{} 个错误）", outcome.errors.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    logging::init();
    tracing::debug!(version = scholarship_interchange::VERSION, "启动");

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("{}", USAGE);
    }
    let command = args.remove(0);
    let config = load_config()?;

    match command.as_str() {
        "export" => run_export(args, &config),
        "import" => run_import(args, &config),
        "--version" | "-V" => {
            println!("{} {}", scholarship_interchange::APP_NAME, scholarship_interchange::VERSION);
            Ok(())
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }
}
