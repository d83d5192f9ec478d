/*!

This is the long-form manual for `irv_ranking` and `irvrank`.

## Algorithm

The ranking is produced round after round:

1. Every ballot that still ranks a candidate contributes its first choice to the
   tally of the round. Empty ballots are skipped.
2. If a candidate has strictly more than half of the active ballots, it takes the next
   position in the ranking (1 for the first such candidate, then 2, ...).
   A candidate with exactly half of the ballots is not a majority.
3. Otherwise, the weakest candidate of the tally is eliminated. It is not ranked.
4. The candidate elected or eliminated is removed from every ballot, wherever it appears.
   The ballots that ranked it first now count for their next choice.
5. The tabulation stops when no ballot has a candidate left.

Names are compared without regard to case, and are reported in lower case.
A candidate ranked twice on the same ballot only counts at its first position.

### Weakest candidate

Each candidate of the tally gets a score: its number of votes plus a fractional
weight in `[0, 1)`. The weight is the 32-bit FNV-1a hash of the lower-cased name,
divided by 2^32. The lowest score is eliminated.

The weight never exceeds one vote, so it only decides between candidates with the
same number of votes. It is fixed for a given name: the same ballots always give the
same ranking, on every platform and across runs.

## Input formats

The following formats are supported by `irvrank`:
* `csv` Comma Separated Values
* `xlsx` Excel spreadsheets

In both cases, each row is one ballot and each cell of the row is a choice, the first
cell being the most preferred. Blank cells are ignored. Rows without any choice are
counted as empty ballots. Rows and columns before the data can be skipped with
`--first-vote-row` and `--first-vote-column` (both start at 1).

```text
Alice,Bob,Charlie
bob,alice
Charlie
```

## Output

The ranking is printed on the standard output, one candidate per line:

```text
1: alice
2: bob
```

With `--out`, a summary of all the rounds is also written in JSON format.

## Configuration

The `--config` flag accepts a JSON file with the following structure. Relative paths
are resolved from the directory of the configuration file.

```json
{
  "outputSettings": {
    "contestName": "Board election",
    "contestDate": "2022-10-01"
  },
  "cvrFileSources": [
    {
      "provider": "csv",
      "filePath": "ballots.csv",
      "firstVoteColumnIndex": 2,
      "firstVoteRowIndex": 2
    }
  ]
}
```

Options given on the command line take precedence over the configuration file.

*/
