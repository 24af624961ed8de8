/*
[INPUT]:  Interactive terminal prompts
[OUTPUT]: CLI subcommand implementations
[POS]:    CLI module root
[UPDATE]: When adding CLI subcommands
*/

pub mod init;
