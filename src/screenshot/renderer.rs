use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::RendererConfig;
use crate::foundation::error::{DocshotError, DocshotResult};
use crate::screenshot::discover::Unit;

/// Where the renderer reads its input from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "path")]
pub enum RenderInput {
    /// Standard output of an executable producer, piped in.
    Producer(PathBuf),
    /// The operator's terminal; the renderer blocks until a screenshot is taken by hand.
    Terminal,
}

/// Everything one renderer invocation needs. Built fresh per unit, so nothing carries over
/// from a previous unit.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RenderJob {
    /// Output key.
    pub title: String,
    /// Spec directory, i.e. the fixture to replay.
    pub spec_dir: PathBuf,
    /// Terminal width.
    pub columns: u32,
    /// Terminal height.
    pub lines: u32,
    /// Expected rendered file.
    pub output: PathBuf,
    /// Stylesheet override for this unit only.
    pub stylesheet: Option<PathBuf>,
    /// Input mode.
    pub input: RenderInput,
}

impl RenderJob {
    /// Job for `unit`, writing into `output_root`.
    pub fn for_unit(unit: &Unit, output_root: &Path) -> Self {
        Self {
            title: unit.spec.title.clone(),
            spec_dir: unit.dir.clone(),
            columns: unit.spec.columns,
            lines: unit.spec.lines,
            output: unit.output_path(output_root),
            stylesheet: unit.stylesheet.clone(),
            input: match &unit.input {
                Some(p) => RenderInput::Producer(p.clone()),
                None => RenderInput::Terminal,
            },
        }
    }
}

/// Capability that produces the image described by a [`RenderJob`].
///
/// Implementations block until the renderer is done. Returning `Ok` does not imply the output
/// exists; the driver checks for it.
pub trait Renderer {
    /// Run one job.
    fn render(&mut self, job: &RenderJob) -> DocshotResult<()>;
}

/// [`Renderer`] spawning an external program configured through environment variables.
#[derive(Clone, Debug)]
pub struct CommandRenderer {
    cfg: RendererConfig,
}

impl CommandRenderer {
    /// Renderer driven by `cfg`.
    pub fn new(cfg: RendererConfig) -> Self {
        Self { cfg }
    }

    /// Arguments for `job` with `{spec_dir}`, `{title}` and `{output}` substituted.
    pub fn args(&self, job: &RenderJob) -> Vec<String> {
        let spec_dir = job.spec_dir.to_string_lossy();
        let output = job.output.to_string_lossy();
        self.cfg
            .args
            .iter()
            .map(|a| {
                a.replace("{spec_dir}", &spec_dir)
                    .replace("{title}", &job.title)
                    .replace("{output}", &output)
            })
            .collect()
    }

    /// Environment variables set for `job`, in a stable order.
    ///
    /// The stylesheet variable is only present when the unit has an override; [`Self::command`]
    /// removes it otherwise so an inherited value cannot apply.
    pub fn env(&self, job: &RenderJob) -> Vec<(String, String)> {
        let mut env: Vec<(String, String)> = self
            .cfg
            .extra_env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        env.push((self.cfg.columns_env.clone(), job.columns.to_string()));
        env.push((self.cfg.lines_env.clone(), job.lines.to_string()));
        if let Some(dir) = job.output.parent() {
            env.push((
                self.cfg.output_dir_env.clone(),
                dir.to_string_lossy().into_owned(),
            ));
        }
        if let Some(name) = job.output.file_name() {
            env.push((
                self.cfg.output_filename_env.clone(),
                name.to_string_lossy().into_owned(),
            ));
        }
        if let Some(css) = &job.stylesheet {
            env.push((
                self.cfg.stylesheet_env.clone(),
                css.to_string_lossy().into_owned(),
            ));
        }
        env
    }

    /// Command for `job`, without stdio configured.
    pub fn command(&self, job: &RenderJob) -> Command {
        let mut cmd = Command::new(&self.cfg.program);
        cmd.args(self.args(job));
        if job.stylesheet.is_none() {
            cmd.env_remove(&self.cfg.stylesheet_env);
        }
        cmd.envs(self.env(job));
        cmd
    }
}

#[cfg(unix)]
fn terminal_stdin() -> DocshotResult<Stdio> {
    let tty = std::fs::File::open("/dev/tty").map_err(|e| {
        DocshotError::tool(format!(
            "manual capture needs a terminal, but /dev/tty could not be opened: {e}"
        ))
    })?;
    Ok(Stdio::from(tty))
}

#[cfg(not(unix))]
fn terminal_stdin() -> DocshotResult<Stdio> {
    Ok(Stdio::inherit())
}

impl Renderer for CommandRenderer {
    fn render(&mut self, job: &RenderJob) -> DocshotResult<()> {
        let mut cmd = self.command(job);

        let mut producer = match &job.input {
            RenderInput::Producer(path) => {
                let mut child = Command::new(path)
                    .current_dir(&job.spec_dir)
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .spawn()
                    .map_err(|e| {
                        DocshotError::tool(format!(
                            "failed to spawn input producer '{}': {e}",
                            path.display()
                        ))
                    })?;
                let Some(stdout) = child.stdout.take() else {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(DocshotError::render(
                        "failed to open input producer stdout (unexpected)",
                    ));
                };
                cmd.stdin(Stdio::from(stdout));
                Some(child)
            }
            RenderInput::Terminal => {
                tracing::info!(title = %job.title, "waiting for manual capture on the terminal");
                cmd.stdin(terminal_stdin()?);
                None
            }
        };

        let spawned = cmd.spawn();
        // Release our copy of the pipe's read end so the producer gets SIGPIPE once the
        // renderer stops reading.
        drop(cmd);

        let mut renderer = match spawned {
            Ok(child) => child,
            Err(e) => {
                if let Some(child) = producer.as_mut() {
                    let _ = child.kill();
                    let _ = child.wait();
                }
                return Err(DocshotError::tool(format!(
                    "failed to spawn renderer '{}' (is it installed and on PATH?): {e}",
                    self.cfg.program
                )));
            }
        };

        let status = renderer.wait().map_err(|e| {
            DocshotError::render(format!(
                "failed to wait for renderer '{}': {e}",
                self.cfg.program
            ))
        });

        if let Some(child) = producer.as_mut() {
            match child.wait() {
                Ok(s) if !s.success() => {
                    tracing::warn!(title = %job.title, status = %s, "input producer failed")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(title = %job.title, "waiting for input producer: {e}"),
            }
        }

        let status = status?;
        if !status.success() {
            return Err(DocshotError::render(format!(
                "renderer '{}' exited with status {status} for '{}'",
                self.cfg.program, job.title
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/screenshot/renderer.rs"]
mod tests;
