use super::*;
use deploy_config::{ConfigResolver, Overrides, Profile};

fn resolved(env: EnvironmentName) -> ResolvedConfig {
    ConfigResolver::new()
        .resolve(
            &Profile::empty().with_global_entry("app_name", "svc"),
            &env,
            &Overrides::new(),
        )
        .unwrap()
}

#[test]
fn test_local_builds_from_source() {
    let fragment = image_or_build(&EnvironmentName::local(), "svc");
    assert!(fragment.contains("build:"));
    assert!(fragment.contains("image: svc:local"));
}

#[test]
fn test_remote_environments_pull_registry_image() {
    let canary = EnvironmentName::parse("canary").unwrap();
    for env in [EnvironmentName::test(), EnvironmentName::prod(), canary] {
        let fragment = image_or_build(&env, "svc");
        assert_eq!(fragment, "    image: ${FULL_REGISTRY_IMAGE}");
    }
}

#[test]
fn test_only_prod_gets_resource_limits() {
    assert!(deploy_section(&EnvironmentName::prod()).contains("limits:"));
    assert!(deploy_section(&EnvironmentName::test()).is_empty());
    assert!(deploy_section(&EnvironmentName::local()).is_empty());
}

#[test]
fn test_custom_env_hint() {
    assert_eq!(custom_env_hint(&[]), "custom-env");
    let envs = vec![
        EnvironmentName::parse("canary").unwrap(),
        EnvironmentName::parse("staging").unwrap(),
    ];
    assert_eq!(custom_env_hint(&envs), "canary staging");
}

#[test]
fn test_makefile_context_uses_branch_values() {
    let context = makefile_context(
        &resolved(EnvironmentName::test()),
        &resolved(EnvironmentName::local()),
        &resolved(EnvironmentName::test()),
        &resolved(EnvironmentName::prod()),
        &[],
    );

    assert_eq!(context["app_name"], "svc");
    assert_eq!(context["env_mode"], "test");
    assert_eq!(context["use_sudo"], true);
    assert_eq!(context["prod"]["remote_user"], "deploy-prod");
    assert_eq!(context["prod"]["compose_file"], "docker-compose.yaml");
    assert_eq!(context["local"]["compose_file"], "docker-compose.local.yaml");
    assert_eq!(context["test"]["remote_port"], 22);
}

#[test]
fn test_compose_context() {
    let context = compose_context(&resolved(EnvironmentName::prod()));
    assert_eq!(context["env"], "prod");
    assert_eq!(context["app_port"], 8080);
    assert_eq!(context["health_endpoint"], "/healthz");
}
