pub const GITIGNORE: &str = "/.arena/\n*.db\n*.db-shm\n*.db-wal\n";
