use mediapack_common::{
  BundleManifest, CommandLine, NormalizedPipelineOptions, PipelineOptions, RequireConfig,
};

pub const DEFAULT_PORT: u16 = 8675;
pub const DEFAULT_IMAGE_ORIGIN: &str = "https://localhost";

/// Port precedence: explicit flag, then the `PORT` environment variable, then the config value.
pub fn resolve_port(flag: Option<u16>, env: Option<&str>, config: Option<u16>) -> u16 {
  flag
    .or_else(|| env.and_then(|value| value.trim().parse().ok()))
    .or(config)
    .unwrap_or(DEFAULT_PORT)
}

fn trim_dir(dir: String) -> String {
  let trimmed = dir.trim_end_matches('/');
  if trimmed.is_empty() { ".".to_string() } else { trimmed.to_string() }
}

pub fn normalize_options(raw_options: PipelineOptions) -> anyhow::Result<NormalizedPipelineOptions> {
  let cwd = match raw_options.cwd {
    Some(cwd) => cwd,
    None => std::env::current_dir()?,
  };

  let css_dest = trim_dir(raw_options.css_dest_path.unwrap_or_else(|| "src/media/css".to_string()));
  let js_dest = trim_dir(raw_options.js_dest_path.unwrap_or_else(|| "src/media/js".to_string()));
  let lib_dest = trim_dir(raw_options.lib_dest_path.unwrap_or_else(|| format!("{js_dest}/lib")));

  let require_config: RequireConfig = raw_options.require_config.unwrap_or_default();
  let base_url =
    trim_dir(require_config.base_url.clone().unwrap_or_else(|| js_dest.clone()));

  let env_port = std::env::var("PORT").ok();

  Ok(NormalizedPipelineOptions {
    cwd,
    paths: raw_options.paths.unwrap_or_default(),
    bower_config: raw_options.bower_config.unwrap_or_default(),
    inline_require_config: raw_options.inline_require_config.unwrap_or_default(),
    install_commands: raw_options.install_commands.unwrap_or_else(|| {
      vec![CommandLine::new("npm", ["install"]), CommandLine::new("bower", ["install"])]
    }),
    css_dest,
    js_dest,
    lib_dest,
    css_bundles: BundleManifest::new(
      raw_options.css_bundles.unwrap_or_default(),
      raw_options.css_excludes.unwrap_or_default(),
    ),
    style_compiler: raw_options.style_compiler,
    image_origin: raw_options
      .image_origin
      .unwrap_or_else(|| DEFAULT_IMAGE_ORIGIN.to_string())
      .trim_end_matches('/')
      .to_string(),
    require_config,
    base_url,
    entry_module: raw_options.entry_module.unwrap_or_else(|| "main".to_string()),
    template_compiler: raw_options.template_compiler,
    port: resolve_port(raw_options.port_override, env_port.as_deref(), raw_options.port),
    template: raw_options.template.unwrap_or_else(|| "index".to_string()),
  })
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use mediapack_common::PipelineOptions;

  use super::{normalize_options, resolve_port};

  #[test]
  fn port_precedence() {
    assert_eq!(resolve_port(Some(1), Some("2"), Some(3)), 1);
    assert_eq!(resolve_port(None, Some("2"), Some(3)), 2);
    assert_eq!(resolve_port(None, Some("not a port"), Some(3)), 3);
    assert_eq!(resolve_port(None, None, Some(3)), 3);
    assert_eq!(resolve_port(None, None, None), 8675);
  }

  #[test]
  fn fills_in_project_defaults() {
    let options = normalize_options(PipelineOptions {
      cwd: Some(PathBuf::from("/project")),
      css_dest_path: Some("src/media/css/".to_string()),
      ..PipelineOptions::default()
    })
    .unwrap();
    assert_eq!(options.css_dest, "src/media/css");
    assert_eq!(options.js_dest, "src/media/js");
    assert_eq!(options.lib_dest, "src/media/js/lib");
    assert_eq!(options.base_url, "src/media/js");
    assert_eq!(options.entry_module, "main");
    assert_eq!(options.image_origin, "https://localhost");
    assert_eq!(options.template, "index");
    assert_eq!(options.install_commands.len(), 2);
    assert_eq!(options.css_dest_dir(), PathBuf::from("/project/src/media/css"));
  }
}
