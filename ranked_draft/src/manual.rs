/*!

This is the long-form manual for `ranked_draft` and `rdraft`.

## Input workbook

The input is an Excel file (`.xlsx`) **without column headers**:

* the first sheet is the roster: one row per auditionee. The first column is
  the audition number, which must be an integer and unique. The other columns
  (name, email, ...) are carried over to the output as they are.
* every other sheet is the preference list of one team, named after the team.
  The first column is the audition number, in decreasing order of preference.
  The other columns are ignored.

Each team ranks independently: the same auditionee may appear on several
lists, and a list may mention numbers that are not in the roster (they are
skipped).

## Running a draft

Project teams, 4 members per team:

```bash
rdraft preferences.xlsx 4
```

Training teams, 3 members chosen by the teams and 5 members in total (the last
2 are drawn at random among the auditionees that are left):

```bash
rdraft preferences.xlsx 3 5
```

The draws are reproducible: running the same command twice on the same file
gives the same teams. Change the seed with `--seed` to get another draw.

## Output

The results are written in the output directory (`output` by default, see `--output-dir`),
with one CSV file per sheet:

* `remaining_roster.csv` (project teams) or `waitlist_roster.csv` (training
  teams): the roster rows of the auditionees who did not get a team.
* one file per team: the roster rows of its members, in the order they were
  drafted. If two teams end up with the same file name (for example `Tap?` and
  `Tap*`), the second one is written to `Tap__2.csv`.

With `--out summary.json` (or `--out stdout`), a summary of the draft is also
written in JSON, including the detail of every round. `--reference` checks the
summary against a previous one.

## Errors

* `audition numbers are not all integers`: a cell of the first column is
  empty, a decimal number or some text.
* `audition numbers are not unique`: the roster lists the same number twice.
* `ran out of preferences`: a team has no preference left to pick from. This
  means that the teams did not submit enough preferences, or that too many
  teams want the same auditionees. Ask the teams for more preferences.

## Configuration

All the options can also be given in a JSON file with `--config`:

```json
{
  "outputSettings": {
    "draftName": "Fall auditions",
    "outputDirectory": "results",
    "summaryFile": "results/summary.json"
  },
  "inputFile": {
    "filePath": "preferences.xlsx"
  },
  "rules": {
    "teamSize": 5,
    "selectSize": 3,
    "randomSeed": "42",
    "tiebreakMode": "random"
  }
}
```

Relative paths are resolved from the directory of the configuration file.
Values passed on the command line take precedence. `tiebreakMode` is
`random` (default) or `digest`. The `digest` mode derives every draw from a
SHA-256 hash: the sequence of draws does not depend on the version of the
program.

*/
