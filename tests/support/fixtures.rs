//! Test fixtures and constants.

/// Profiles with constant values only: `child` depends on `root`.
pub const CONST_PROFILES: &str = r#"
[profiles.root]
const_env = { ROOT = "r" }

[profiles.child]
depends_on = ["root"]
const_env = { CHILD = "c" }

[profiles.other]
depends_on = ["root"]
const_env = { OTHER = "o" }
"#;

/// Fake `gpg` that "decrypts" by printing the file it is given.
pub const FAKE_GPG: &str = r#"#!/bin/sh
for last; do :; done
cat "$last"
"#;

/// Fake `keepassxc-cli` accepting the password `secret` and knowing one entry,
/// whose notes span two lines.
pub const FAKE_KEEPASSXC: &str = r#"#!/bin/sh
read -r pw
if [ "$pw" != "secret" ]; then
  echo "Error while reading the database: Invalid credentials were provided" >&2
  exit 1
fi
for last; do :; done
case "$last" in
  databases/prod)
    case " $* " in
      *" --attributes Notes "*)
        printf 'primary replica\nhost: db1\n'
        ;;
      *)
        printf 'Notes: primary replica\nhost: db1\nPassword: s3cr3t\nTitle: prod\nURL: postgres://db:5432\nUserName: alice\n'
        ;;
    esac
    ;;
  *)
    echo "Could not find entry with path $last." >&2
    exit 1
    ;;
esac
"#;

/// Contents of a password-store secret as the fake gpg returns it.
pub const PASS_SECRET: &str = "hunter2\nusername: bob\n";

/// Config with a pass storage rooted at `dir` and a profile mapping from it.
pub fn pass_config(dir: &std::path::Path) -> String {
    format!(
        r#"
[storages.personal]
type = "pass"
config = {{ dir = "{}", prefix = "env" }}

[profiles.api]
storage = "personal"
path = "api/token"
env = {{ API_USER = "username", API_TOKEN = "password" }}
"#,
        dir.display()
    )
}

/// Config with a keepass storage for `file` and a profile mapping from it.
pub fn keepass_config(file: &std::path::Path) -> String {
    format!(
        r#"
[storages.work]
type = "keepass"
config = {{ path = "{}" }}

[profiles.db]
storage = "work"
path = "databases/prod"
const_env = {{ DB_NAME = "prod" }}
env = {{ DB_USER = "UserName", DB_PASS = "Password" }}

[profiles.broken]
storage = "work"
path = "databases/prod"
env = {{ DB_TOKEN = "Token" }}

[profiles.notes]
storage = "work"
path = "databases/prod"
env = {{ DB_NOTES = "Notes" }}

[profiles.missing]
storage = "work"
path = "databases/staging"
env = {{ DB_USER = "UserName" }}
"#,
        file.display()
    )
}

/// Config with only a pass storage rooted at `dir`.
pub fn pass_storage(dir: &std::path::Path) -> String {
    format!(
        "[storages.personal]\ntype = \"pass\"\nconfig = {{ dir = \"{}\" }}\n",
        dir.display()
    )
}
