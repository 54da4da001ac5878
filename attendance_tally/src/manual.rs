/*!

This is the long-form manual for `attendance_tally` and `rollcall`.

## How names are matched

Every name (on the roster and in the attendance log) goes through the same
normalization:

* lower case, leading and trailing whitespace removed
* accents removed (`João` becomes `joao`)
* everything that is not a letter `a-z`, a digit or whitespace removed
  (`d'Ávila.` becomes `davila`)

The order of the words is kept: `Silva, João` and `João Silva` are different
keys. Double spaces typed by mistake are also kept, unless the
`collapseWhitespace` rule is turned on.

Each normalized attendance entry is then searched approximately among the
normalized roster names. The score of a roster name is the number of edits
needed to find the entry in it, divided by the length of the entry, plus a
small penalty when the entry is found far from the beginning of the name.
Only identical names score 0; a name found inside a longer roster name
scores at least 0.001, so `Maria Silva` goes to `Maria Silva` rather than
to `Maria Silva Santos`. Among equal scores, the roster name closest in
length to the entry wins. Only scores up to `matchThreshold`
(0.4 by default) count. The roster name with the lowest score gets one more
class; when scores and lengths are equal, the earliest roster row wins.

If several roster rows carry exactly the same normalized name, the
attendance entry is *ambiguous*. A warning is printed and, depending on
`duplicateNameMode`, the first row is credited (`firstRanked`, the default)
or nobody is (`unassigned`).

## Input formats

The following formats are supported, both for the roster and for the
attendance log:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel spreadsheets (`xls` and `ods` are also accepted)

If no provider is given, it is inferred from the extension of the file.

### Roster

The first non-blank row contains the column names: rows that are empty in
every cell are skipped, before and after the header. The columns holding the full name
and the email are found by their label (`Nome Completo` and `Email` by
default, see `nameColumn` and `emailColumn`). Other columns are ignored.

```text
Nome Completo,Email,Turma
Ana Silva,a@x.com,A
Bruno Costa,b@x.com,B
```

### Attendance

Only the first column is read. The first non-blank row is a header whose
label does not matter. Every following row is one attended session:

```text
Participant
ana silva
Ana  Silva
bruno costa
```

Empty rows are skipped. For spreadsheet inputs, the first worksheet is used
unless `excelWorksheetName` is provided.

## Configuration

`rollcall` accepts a configuration file in JSON:

```json
{
  "outputSettings": {
    "courseName": "Introduction to Rust",
    "courseDate": "2024-05-10",
    "courseWorkload": "20h"
  },
  "rosterSource": { "provider": "csv", "filePath": "roster.csv" },
  "attendanceSource": { "provider": "csv", "filePath": "attendance.csv" },
  "rules": {
    "totalClasses": 10,
    "minimumPercent": 75
  }
}
```

The paths are relative to the directory of the configuration file.

Options for a source:
 - `provider` (string, optional): `csv` or `xlsx`.
 - `filePath` (string): the location of the file.
 - `excelWorksheetName` (string, optional): the worksheet to read.
 - `nameColumn`, `emailColumn` (string, optional, roster only): the labels
   of the name and email columns.

Options for the rules:
 - `totalClasses` (integer): the number of classes given. When it is 0 or
   negative, all the percentages are 0.
 - `minimumPercent` (number, default 75): the attendance required to be
   approved. Reaching it exactly is enough.
 - `matchThreshold` (number between 0 and 1, default 0.4).
 - `matchDistance` (integer, default 100): how strongly matches found far
   from the beginning of a name are penalized. 0 only accepts matches at
   the beginning.
 - `collapseWhitespace` (boolean, default false).
 - `duplicateNameMode` (`firstRanked` or `unassigned`, default `firstRanked`).

All the options can be overridden on the command line; run `rollcall --help`.

## Outputs

The summary is written in JSON (to the standard output by default, or with
`--out`). `--export` writes the results as a CSV file with the columns
`Full Name`, `Email`, `Classes Attended`, `Attendance (%)` and `Status`;
when the file name ends in `.xlsx`, the same table is written as an Excel
workbook with a single worksheet, `Attendance Results`.
With `--reference`, the summary is compared with a previously saved summary
and the program fails when they differ.

 */
