mod common;

use buildah_build::{BuildStage, RunError};
use buildah_build_core::{BuildResult, RawInputs};
use buildah_client::StorageProbe;
use common::{CONTAINER_ID, ScriptedRunner, empty_probe, orchestrator, strings};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const SCRATCH_STEPS: [&str; 4] = ["from", "config", "copy", "commit"];

fn dockerfile_inputs(tags: &str) -> RawInputs {
    RawInputs {
        image: "demo".to_string(),
        tags: tags.to_string(),
        dockerfiles: "Dockerfile".to_string(),
        context: ".".to_string(),
        ..Default::default()
    }
}

fn scratch_inputs(tags: &str) -> RawInputs {
    RawInputs {
        image: "demo".to_string(),
        tags: tags.to_string(),
        base_image: "scratch".to_string(),
        content: "bin/app".to_string(),
        ..Default::default()
    }
}

/// image="demo", tags="", dockerfiles=["Dockerfile"], context="."
#[tokio::test]
async fn test_scenario_dockerfile_default_tag() {
    let runner = ScriptedRunner::new();
    let request = dockerfile_inputs("").normalize(Path::new("/work")).unwrap();

    let result = orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    assert_eq!(runner.subcommands(), vec!["version", "bud"]);
    assert_eq!(
        runner.call("bud"),
        strings(&[
            "bud",
            "--format",
            "docker",
            "-f",
            "/work/Dockerfile",
            "--tag",
            "demo:latest",
            "/work/.",
        ])
    );
    assert_eq!(
        result,
        BuildResult {
            image: "demo".to_string(),
            tags: strings(&["latest"]),
        }
    );
}

/// image="demo", tags="v1 v2", base_image="scratch", content=["bin/app"]
#[tokio::test]
async fn test_scenario_scratch_two_tags() {
    let runner = ScriptedRunner::new();
    let request = scratch_inputs("v1 v2").normalize(Path::new("/work")).unwrap();

    let result = orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    assert_eq!(
        runner.subcommands(),
        vec!["version", "from", "config", "copy", "commit", "tag"]
    );
    assert_eq!(runner.call("from"), strings(&["from", "scratch"]));
    assert_eq!(runner.call("config"), strings(&["config", CONTAINER_ID]));
    assert_eq!(runner.call("copy"), strings(&["copy", CONTAINER_ID, "bin/app"]));
    assert_eq!(
        runner.call("commit"),
        strings(&["commit", "--format", "docker", CONTAINER_ID, "demo:v1"])
    );
    assert_eq!(runner.call("tag"), strings(&["tag", "demo:v1", "demo:v2"]));
    assert_eq!(
        result,
        BuildResult {
            image: "demo".to_string(),
            tags: strings(&["v1", "v2"]),
        }
    );
}

#[tokio::test]
async fn test_dockerfile_build_issues_no_scratch_steps() {
    let runner = ScriptedRunner::new();
    let request = dockerfile_inputs("v1").normalize(Path::new("/work")).unwrap();

    orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    let subcommands = runner.subcommands();
    assert_eq!(subcommands.iter().filter(|s| *s == "bud").count(), 1);
    assert!(subcommands.iter().all(|s| !SCRATCH_STEPS.contains(&s.as_str())));
    assert!(!subcommands.iter().any(|s| s == "tag"));
}

#[tokio::test]
async fn test_multiple_dockerfiles_with_everything_set() {
    let runner = ScriptedRunner::new();
    let raw = RawInputs {
        image: "quay.io/acme/app".to_string(),
        tags: "1.0 stable".to_string(),
        dockerfiles: "Dockerfile\nDockerfile.extra\n".to_string(),
        context: "app".to_string(),
        build_args: "VERSION=1.0\nDEBUG=false".to_string(),
        layers: "false".to_string(),
        extra_args: "--pull-always\n--no-cache".to_string(),
        oci: "true".to_string(),
        arch: "amd64".to_string(),
        archs: "arm64".to_string(),
        ..Default::default()
    };
    let request = raw.normalize(Path::new("/work")).unwrap();

    orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    assert_eq!(
        runner.call("bud"),
        strings(&[
            "bud",
            "--format",
            "oci",
            "-f",
            "/work/Dockerfile",
            "-f",
            "/work/Dockerfile.extra",
            "--build-arg",
            "VERSION=1.0",
            "--build-arg",
            "DEBUG=false",
            "--arch",
            "amd64",
            "--layers=false",
            "--tag",
            "quay.io/acme/app:1.0",
            "--pull-always",
            "--no-cache",
            "/work/app",
        ])
    );
    assert_eq!(
        runner.call("tag"),
        strings(&["tag", "quay.io/acme/app:1.0", "quay.io/acme/app:stable"])
    );
}

#[tokio::test]
async fn test_scratch_steps_share_one_container() {
    let runner = ScriptedRunner::new();
    let raw = RawInputs {
        image: "demo".to_string(),
        base_image: "registry.access.redhat.com/ubi9-micro".to_string(),
        content: "bin/app\nconfig/app.toml".to_string(),
        entrypoint: "/bin/app\n--port\n8080".to_string(),
        port: "8080".to_string(),
        workdir: "/srv".to_string(),
        envs: "MODE=prod\nLOG=debug".to_string(),
        archs: "arm64".to_string(),
        oci: "true".to_string(),
        ..Default::default()
    };
    let request = raw.normalize(Path::new("/work")).unwrap();

    orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    let calls = runner.calls();
    let scratch: Vec<_> = calls.iter().skip(1).collect();
    assert_eq!(
        scratch.iter().map(|c| c.subcommand()).collect::<Vec<_>>(),
        vec!["from", "config", "copy", "copy", "commit"]
    );
    for call in &scratch[1..] {
        assert!(call.args.iter().any(|a| a == CONTAINER_ID));
    }

    assert_eq!(
        runner.call("config"),
        strings(&[
            "config",
            "--entrypoint",
            r#"["/bin/app","--port","8080"]"#,
            "--port",
            "8080",
            "--workingdir",
            "/srv",
            "--env",
            "MODE=prod",
            "--env",
            "LOG=debug",
            "--arch",
            "arm64",
            CONTAINER_ID,
        ])
    );
    assert_eq!(scratch[2].args, strings(&["copy", CONTAINER_ID, "bin/app"]));
    assert_eq!(
        scratch[3].args,
        strings(&["copy", CONTAINER_ID, "config/app.toml"])
    );
    assert_eq!(
        runner.call("commit"),
        strings(&["commit", "--format", "oci", CONTAINER_ID, "demo:latest"])
    );
}

#[tokio::test]
async fn test_scratch_without_content_skips_copy() {
    let runner = ScriptedRunner::new();
    let raw = RawInputs {
        image: "demo".to_string(),
        base_image: "alpine".to_string(),
        ..Default::default()
    };
    let request = raw.normalize(Path::new("/work")).unwrap();

    orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    assert_eq!(
        runner.subcommands(),
        vec!["version", "from", "config", "commit"]
    );
}

#[tokio::test]
async fn test_three_tags_single_tag_call() {
    let runner = ScriptedRunner::new();
    let request = dockerfile_inputs("v1 v2 v3")
        .normalize(Path::new("/work"))
        .unwrap();

    orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    let tag_calls: Vec<_> = runner
        .calls()
        .into_iter()
        .filter(|c| c.subcommand() == "tag")
        .collect();
    assert_eq!(tag_calls.len(), 1);
    assert_eq!(
        tag_calls[0].args,
        strings(&["tag", "demo:v1", "demo:v2", "demo:v3"])
    );
}

#[tokio::test]
async fn test_version_failure_stops_everything() {
    let runner = ScriptedRunner::failing_on("version");
    let request = dockerfile_inputs("v1 v2").normalize(Path::new("/work")).unwrap();

    let err = orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Builder {
            stage: BuildStage::Version,
            ..
        }
    ));
    assert_eq!(runner.subcommands(), vec!["version"]);
}

#[tokio::test]
async fn test_dockerfile_failure_skips_tagging() {
    let runner = ScriptedRunner::failing_on("bud");
    let request = dockerfile_inputs("v1 v2").normalize(Path::new("/work")).unwrap();

    let err = orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Builder {
            stage: BuildStage::Dockerfile,
            ..
        }
    ));
    assert_eq!(runner.subcommands(), vec!["version", "bud"]);
    assert!(err.to_string().contains("bud failed"));
}

#[tokio::test]
async fn test_each_scratch_failure_stops_later_steps() {
    let cases = [
        ("from", BuildStage::From),
        ("config", BuildStage::Config),
        ("copy", BuildStage::Copy),
        ("commit", BuildStage::Commit),
        ("tag", BuildStage::Tag),
    ];
    let all = ["version", "from", "config", "copy", "commit", "tag"];

    for (failing, stage) in cases {
        let runner = ScriptedRunner::failing_on(failing);
        let request = scratch_inputs("v1 v2").normalize(Path::new("/work")).unwrap();

        let err = orchestrator(&runner, empty_probe())
            .run(&request)
            .await
            .unwrap_err();

        match err {
            RunError::Builder { stage: got, .. } => assert_eq!(got, stage),
            other => panic!("unexpected error for {}: {:?}", failing, other),
        }

        let expected: Vec<&str> = all
            .iter()
            .copied()
            .take_while(|s| *s != failing)
            .chain(std::iter::once(failing))
            .collect();
        assert_eq!(runner.subcommands(), expected, "failing on {}", failing);
    }
}

#[tokio::test]
async fn test_storage_environment_applies_after_version() {
    let bin_dir = tempfile::tempdir().unwrap();
    let helper = bin_dir.path().join("fuse-overlayfs");
    fs::write(&helper, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&helper, fs::Permissions::from_mode(0o755)).unwrap();

    let probe = StorageProbe::new()
        .with_search_path(bin_dir.path().as_os_str().to_os_string())
        .with_storage_conf_candidates(vec![]);

    let runner = ScriptedRunner::new();
    let request = scratch_inputs("v1").normalize(Path::new("/work")).unwrap();
    orchestrator(&runner, probe).run(&request).await.unwrap();

    let calls = runner.calls();
    assert!(calls[0].env.is_empty());

    let expected_opts = format!("overlay.mount_program={}", helper.display());
    for call in &calls[1..] {
        assert_eq!(call.env.get("STORAGE_DRIVER").map(String::as_str), Some("overlay"));
        assert_eq!(call.env.get("STORAGE_OPTS"), Some(&expected_opts));
    }
}

#[tokio::test]
async fn test_no_helper_means_no_overrides() {
    let runner = ScriptedRunner::new();
    let request = scratch_inputs("v1").normalize(Path::new("/work")).unwrap();
    orchestrator(&runner, empty_probe())
        .run(&request)
        .await
        .unwrap();

    assert!(runner.calls().iter().all(|c| c.env.is_empty()));
}
