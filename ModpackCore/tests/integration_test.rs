use modpack_core::prelude::*;
use modpack_core::time_travel;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn talisman_map() -> DependencyMap {
    let mut deps = DependencyMap::new();
    deps.insert("Cryptid".into(), vec!["Talisman".into()]);
    deps.insert("Oiiman-s-Additions".into(), vec!["Cryptid".into(), "Talisman".into()]);
    deps
}

#[test]
fn test_exclude_then_include_restores_leaf_state() {
    let resolver = DependencyResolver::new(talisman_map());
    let mut selection = ModSelection::new(["Cryptid", "Talisman", "Oiiman-s-Additions", "Bunco"], &[]);
    resolver.toggle(&mut selection, "Bunco", true);
    let before = selection.clone();

    // Oiiman-s-Additions has no dependents, so the round trip is exact
    resolver.toggle(&mut selection, "Oiiman-s-Additions", true);
    resolver.toggle(&mut selection, "Oiiman-s-Additions", false);
    assert_eq!(selection, before);
}

#[test]
fn test_builtin_registry_resolves_selection() {
    let registry = ModpackRegistry::builtin();
    let resolver = DependencyResolver::new(registry.dependencies());
    let mut selection = ModSelection::new(["Talisman", "Cryptid", "Steamodded"], &["Steamodded"]);

    resolver.toggle(&mut selection, "Talisman", true);
    assert_eq!(selection.excluded(), vec!["Talisman".to_string(), "Cryptid".to_string()]);
    assert!(!selection.contains("Steamodded"));
    assert!(resolver.is_consistent(&selection));
}

#[test]
fn test_install_with_resolved_selection() {
    let dir = tempdir().unwrap();
    let modpack = dir.path().join("Modpacks").join("Dimserenes-Modpack");
    for name in ["Steamodded", "ModpackUtil", "Talisman", "Cryptid", "Bunco", "DebugPlus"] {
        let mod_dir = modpack.join("Mods").join(name);
        fs::create_dir_all(&mod_dir).unwrap();
        fs::write(mod_dir.join("main.lua"), name).unwrap();
    }
    fs::write(modpack.join("Mods/DebugPlus/tk_debug_window.py"), "").unwrap();

    let available = modpack_core::install::list_mods(&modpack).unwrap();
    let locked: Vec<&str> = modpack_core::install::MANDATORY_MODS.to_vec();
    let mut selection = ModSelection::new(available.iter().map(String::as_str), &locked);
    let resolver = DependencyResolver::new(talisman_map());
    resolver.toggle(&mut selection, "Talisman", true);

    let mods_dir = dir.path().join("Balatro").join("Mods");
    let options = InstallOptions {
        remove_existing: true,
        ..Default::default()
    };
    let report = install_modpack(&modpack, &mods_dir, &selection.excluded(), &options, &|_| {}).unwrap();

    assert!(mods_dir.join("Steamodded/main.lua").exists());
    assert!(mods_dir.join("ModpackUtil/main.lua").exists());
    assert!(mods_dir.join("Bunco/main.lua").exists());
    assert!(!mods_dir.join("Talisman").exists());
    assert!(!mods_dir.join("Cryptid").exists());
    assert!(!mods_dir.join("DebugPlus").exists());
    assert_eq!(report.removed_debug, vec!["DebugPlus".to_string()]);

    uninstall(&mods_dir).unwrap();
    assert!(!mods_dir.exists());
}

#[test]
fn test_save_backup_cycle() {
    let dir = tempdir().unwrap();
    let mods_dir = dir.path().join("Balatro").join("Mods");
    let backups = SaveBackups::from_mods_dir(&mods_dir, "1").unwrap();
    fs::create_dir_all(backups.save_file().parent().unwrap()).unwrap();
    fs::write(backups.save_file(), "ante 3").unwrap();

    let backup = backups.perform().unwrap();
    fs::write(backups.save_file(), "ante 8").unwrap();
    let name = backup.file_name().unwrap().to_string_lossy().to_string();
    backups.restore(&name).unwrap();

    assert_eq!(fs::read_to_string(backups.save_file()).unwrap(), "ante 3");
    assert_eq!(backups.list().unwrap().len(), 2);
    assert_eq!(backups.delete_all().unwrap(), 2);
}

fn git(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(repo)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn test_time_travel_on_local_repository() {
    let client = GitClient::default();
    if !client.is_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let dir = tempdir().unwrap();
    let repo = dir.path();
    git(repo, &["init", "-q"]);
    git(repo, &["checkout", "-q", "-b", "main"]);
    for version in ["1.0.0", "1.1.0", "1.2.0"] {
        fs::write(repo.join("CurrentVersion.txt"), version).unwrap();
        git(repo, &["add", "."]);
        git(repo, &["commit", "-q", "-m", version]);
    }

    let versions = time_travel::list_versions(&client, repo).unwrap();
    assert_eq!(versions.len(), 3);
    assert_eq!(versions[0].subject, "1.2.0");

    let target = time_travel::find_version(&client, repo, r"1\.0\.\d").unwrap();
    assert_eq!(target.subject, "1.0.0");
    time_travel::travel_to(&client, repo, &target.hash).unwrap();
    assert_eq!(fs::read_to_string(repo.join("CurrentVersion.txt")).unwrap(), "1.0.0");
    assert_eq!(client.current_branch(repo).unwrap(), "HEAD");

    time_travel::travel_back(&client, repo).unwrap();
    assert_eq!(client.current_branch(repo).unwrap(), "main");
    assert_eq!(fs::read_to_string(repo.join("CurrentVersion.txt")).unwrap(), "1.2.0");

    assert!(matches!(
        time_travel::find_version(&client, repo, "0.9"),
        Err(Error::CommitNotFound(_))
    ));
}
