use anyhow::Result;
use colored::Colorize;
use gene_summon_core::numbers::usize_to_f64;
use std::io::Write;
use std::time::Duration;

use super::CheckResult;

fn success_rate(results: &[CheckResult]) -> f64 {
    let passed = results.iter().filter(|r| r.passed).count();
    usize_to_f64(passed) / usize_to_f64(results.len().max(1)) * 100.0
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[CheckResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Distribution Check Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=============================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    writeln!(out, "Total checks: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            out,
            "{} {} (seed {}, {} draws)",
            status,
            result.check.key().bold(),
            result.seed,
            result.draws
        )?;
        writeln!(out, "   Max deviation: {:.4}", result.max_deviation)?;
        for row in &result.rows {
            writeln!(
                out,
                "   {:<40} expected {:>7.4}  observed {:>7.4}",
                row.label, row.expected, row.observed
            )?;
        }

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, results: &[CheckResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[CheckResult],
) -> Result<()> {
    writeln!(out, "# Gene Summon Distribution Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total checks**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;

    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "### {} {} (seed {})\n",
            status,
            result.check.key(),
            result.seed
        )?;
        writeln!(out, "- **Draws**: {}", result.draws)?;
        writeln!(out, "- **Max deviation**: {:.4}\n", result.max_deviation)?;
        writeln!(out, "| Outcome | Expected | Observed |")?;
        writeln!(out, "|---|---:|---:|")?;
        for row in &result.rows {
            writeln!(
                out,
                "| {} | {:.4} | {:.4} |",
                row.label, row.expected, row.observed
            )?;
        }

        if !result.failures.is_empty() {
            writeln!(out, "\n- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }

    Ok(())
}
