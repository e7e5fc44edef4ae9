//! Answers file generation tests

use answersmith::config::Configuration;
use answersmith::error::AnswersError;
use answersmith::operations::generate::Generator;
use answersmith::operations::template::{AnswersTemplate, TEMPLATE_DIR_ENV, template_path};
use answersmith::system::{MockSystem, PRIVATE_FILE_MODE, RealSystem, System};
use std::env::VarError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEST_TEMPLATE: &str = r#"KEYMAPOPTS="{{ keymap }} {{ keymap }}"
HOSTNAMEOPTS="-n {{ hostname }}"
INTERFACESOPTS="auto lo
iface lo inet loopback

auto {{ network_iface }}
iface {{ network_iface }} inet dhcp
"
TIMEZONEOPTS="-z {{ timezone }}"
PROXYOPTS="none"
APKREPOSOPTS="-f"
SSHDOPTS="-c openssh"
NTPOPTS="-c chrony"
DISKOPTS="-m sys {{ disk_device }}"
USEROPTS="-a -u -g {% for group in groups %}{% if not loop.first %},{% endif %}{{ group }}{% endfor %} {{ username }}"
PWUSER="{{ password }}"
"#;

fn test_config() -> Configuration {
    Configuration {
        hostname: "test-host".to_owned(),
        username: "testuser".to_owned(),
        password: "testpass".to_owned(),
        timezone: "UTC".to_owned(),
        keymap: "us".to_owned(),
        network_iface: "eth0".to_owned(),
        disk_device: "/dev/sda".to_owned(),
        groups: vec!["audio".to_owned(), "video".to_owned()],
        ssh_key: None,
    }
}

fn system_with_template(template: &str) -> MockSystem {
    MockSystem::new()
        .with_current_dir("/home/tester/project")
        .unwrap()
        .with_env("HOME", "/home/tester")
        .unwrap()
        .with_env(TEMPLATE_DIR_ENV, "/srv/templates")
        .unwrap()
        .with_file("/srv/templates/answers.tmpl", template.as_bytes())
        .unwrap()
}

/// Real filesystem with the template directory pinned, so tests never touch
/// the process environment
struct PinnedTemplateDir {
    dir: PathBuf,
}

impl System for PinnedTemplateDir {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        if key == TEMPLATE_DIR_ENV {
            return Ok(self.dir.to_string_lossy().into_owned());
        }
        RealSystem.env_var(key)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        RealSystem.current_dir()
    }

    fn temp_dir(&self) -> PathBuf {
        RealSystem.temp_dir()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        RealSystem.home_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        RealSystem.read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        RealSystem.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        RealSystem.is_dir(path)
    }

    fn create_private(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        RealSystem.create_private(path)
    }
}

fn real_workspace() -> (TempDir, PinnedTemplateDir) {
    let temp_dir = TempDir::new().unwrap();
    let templates = temp_dir.path().join("templates");
    fs::create_dir(&templates).unwrap();
    fs::write(templates.join("answers.tmpl"), TEST_TEMPLATE).unwrap();
    (temp_dir, PinnedTemplateDir { dir: templates })
}

#[test]
fn test_generate_answers_file() {
    let system = system_with_template(TEST_TEMPLATE);
    let config = test_config();

    let written = Generator::new(&config, "/tmp/test-answers.txt")
        .generate(&system)
        .unwrap();
    assert_eq!(written, PathBuf::from("/tmp/test-answers.txt"));

    let content = system.read_to_string(&written).unwrap();
    for expected in [
        r#"KEYMAPOPTS="us us""#,
        r#"HOSTNAMEOPTS="-n test-host""#,
        "auto eth0\niface eth0 inet dhcp",
        r#"USEROPTS="-a -u -g audio,video testuser""#,
        r#"PWUSER="testpass""#,
        r#"DISKOPTS="-m sys /dev/sda""#,
    ] {
        assert!(
            content.contains(expected),
            "missing {expected:?} in:\n{content}"
        );
    }
}

#[test]
fn test_single_and_empty_groups() {
    let system = system_with_template(TEST_TEMPLATE);

    let mut config = test_config();
    config.groups = vec!["wheel".to_owned()];
    Generator::new(&config, "/tmp/one.txt")
        .generate(&system)
        .unwrap();
    let content = system.read_to_string(Path::new("/tmp/one.txt")).unwrap();
    assert!(content.contains(r#"USEROPTS="-a -u -g wheel testuser""#));

    config.groups.clear();
    Generator::new(&config, "/tmp/none.txt")
        .generate(&system)
        .unwrap();
    let content = system.read_to_string(Path::new("/tmp/none.txt")).unwrap();
    assert!(content.contains(r#"USEROPTS="-a -u -g  testuser""#));
}

#[test]
fn test_relative_output_lands_in_working_directory() {
    let system = system_with_template(TEST_TEMPLATE);
    let config = test_config();

    Generator::new(&config, "answers.txt")
        .generate(&system)
        .unwrap();

    assert!(system.exists(Path::new("/home/tester/project/answers.txt")));
}

#[test]
fn test_generated_file_is_private() {
    let system = system_with_template(TEST_TEMPLATE);
    let config = test_config();

    Generator::new(&config, "/tmp/private.txt")
        .generate(&system)
        .unwrap();

    assert_eq!(
        system.file_mode(Path::new("/tmp/private.txt")),
        Some(PRIVATE_FILE_MODE)
    );
}

#[test]
fn test_missing_template() {
    let system = MockSystem::new()
        .with_env(TEMPLATE_DIR_ENV, "/srv/empty")
        .unwrap();
    let config = test_config();

    let err = Generator::new(&config, "/tmp/answers.txt")
        .generate(&system)
        .unwrap_err();

    assert!(matches!(err, AnswersError::TemplateParse { .. }));
    assert!(err.to_string().contains("not found"), "{err}");
    assert!(!system.exists(Path::new("/tmp/answers.txt")));
}

#[test]
fn test_template_is_checked_before_output_path() {
    let system = MockSystem::new()
        .with_env(TEMPLATE_DIR_ENV, "/srv/empty")
        .unwrap();
    let config = test_config();

    let err = Generator::new(&config, "/etc/answers.txt")
        .generate(&system)
        .unwrap_err();

    assert!(matches!(err, AnswersError::TemplateParse { .. }));
}

#[test]
fn test_template_syntax_error() {
    let system = system_with_template("USEROPTS=\"{% for group in groups %}{{ group }}\"\n");
    let config = test_config();

    let err = Generator::new(&config, "/tmp/answers.txt")
        .generate(&system)
        .unwrap_err();

    assert!(matches!(err, AnswersError::TemplateParse { .. }));
    assert!(err.to_string().contains("syntax error"));
}

#[test]
fn test_undefined_field_is_named() {
    let system = system_with_template("HOSTNAMEOPTS=\"-n {{ hostname }}\"\nROOTPW=\"{{ root_password }}\"\n");
    let config = test_config();

    let err = Generator::new(&config, "/tmp/answers.txt")
        .generate(&system)
        .unwrap_err();

    match &err {
        AnswersError::TemplateExecution { field, .. } => {
            assert_eq!(field.as_deref(), Some("root_password"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("root_password"));
}

#[test]
fn test_undefined_field_names_the_evaluated_reference() {
    let system = system_with_template(
        "{% if false %}{{ aaa_unused }}{% endif %}\nHOSTNAMEOPTS=\"-n {{ zzz_host }}\"\n",
    );
    let config = test_config();

    let err = Generator::new(&config, "/tmp/answers.txt")
        .generate(&system)
        .unwrap_err();

    match &err {
        AnswersError::TemplateExecution { field, .. } => {
            assert_eq!(field.as_deref(), Some("zzz_host"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_failed_render_leaves_truncated_file() {
    let system = system_with_template("ROOTPW=\"{{ root_password }}\"\n")
        .with_file("/tmp/answers.txt", b"previous contents")
        .unwrap();
    let config = test_config();

    Generator::new(&config, "/tmp/answers.txt")
        .generate(&system)
        .unwrap_err();

    assert_eq!(
        system.read_to_string(Path::new("/tmp/answers.txt")).unwrap(),
        ""
    );
}

#[test]
fn test_rejected_output_path_is_not_created() {
    let system = system_with_template(TEST_TEMPLATE);
    let config = test_config();

    let err = Generator::new(&config, "../../etc/answers.txt")
        .generate(&system)
        .unwrap_err();

    assert!(matches!(err, AnswersError::PathNotAllowed { .. }));
    assert!(!system.exists(Path::new("/home/etc/answers.txt")));
}

#[test]
fn test_unwritable_output() {
    let system = system_with_template(TEST_TEMPLATE)
        .with_read_only("/tmp/locked.txt")
        .unwrap();
    let config = test_config();

    let err = Generator::new(&config, "/tmp/locked.txt")
        .generate(&system)
        .unwrap_err();

    assert!(matches!(err, AnswersError::FileCreate { .. }));
    assert!(err.to_string().contains("failed to create output file"));
}

#[test]
fn test_template_dir_defaults_to_templates() {
    let system = MockSystem::new();
    assert_eq!(template_path(&system), PathBuf::from("templates/answers.tmpl"));

    let system = MockSystem::new()
        .with_env(TEMPLATE_DIR_ENV, "/opt/answersmith")
        .unwrap();
    assert_eq!(
        template_path(&system),
        PathBuf::from("/opt/answersmith/answers.tmpl")
    );
}

#[test]
fn test_real_generation_is_idempotent() {
    let (temp_dir, system) = real_workspace();
    let output = temp_dir.path().join("answers.txt");
    let config = test_config();

    Generator::new(&config, &output).generate(&system).unwrap();
    let first = fs::read(&output).unwrap();

    Generator::new(&config, &output).generate(&system).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
    assert!(String::from_utf8(first).unwrap().contains("-g audio,video testuser"));
}

#[cfg(unix)]
#[test]
fn test_real_file_permissions() {
    use std::os::unix::fs::PermissionsExt as _;

    let (temp_dir, system) = real_workspace();
    let output = temp_dir.path().join("answers.txt");

    // Wider bits on an existing file must not survive
    fs::write(&output, "old").unwrap();
    fs::set_permissions(&output, fs::Permissions::from_mode(0o644)).unwrap();

    let config = test_config();
    Generator::new(&config, &output).generate(&system).unwrap();

    let mode = fs::metadata(&output).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn test_shipped_template_renders_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates/answers.tmpl");
    let template = AnswersTemplate::load(&RealSystem, &path).unwrap();

    let rendered = template.render(&Configuration::default()).unwrap();

    assert!(rendered.contains(r#"HOSTNAMEOPTS="-n alpinehost""#));
    assert!(rendered.contains(r#"USEROPTS="-a -u -g audio,video,netdev alpine""#));
    assert!(rendered.contains(r#"DISKOPTS="-m sys /dev/mmcblk0""#));
    assert!(rendered.contains(r#"APKREPOSOPTS="-f""#));
    assert!(rendered.ends_with('\n'));

    let keys: Vec<&str> = rendered
        .lines()
        .filter_map(|line| line.split_once('=').map(|(key, _)| key))
        .filter(|key| key.ends_with("OPTS") || *key == "PWUSER")
        .collect();
    assert_eq!(
        keys,
        [
            "KEYMAPOPTS",
            "HOSTNAMEOPTS",
            "INTERFACESOPTS",
            "TIMEZONEOPTS",
            "PROXYOPTS",
            "APKREPOSOPTS",
            "SSHDOPTS",
            "NTPOPTS",
            "DISKOPTS",
            "USEROPTS",
            "PWUSER",
        ]
    );
}
